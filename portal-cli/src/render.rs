// Terminal rendering of portal view models, as text or JSON

use portal_core::auth::{GuardDecision, LoginOutcome, Redirect, Route};
use portal_core::model::Session;
use portal_core::status::{ServerStatus, StatusProbe};
use portal_core::view::{
    AnnouncementCard, ButtonAction, InviteCodeRow, Notice, NoticeKind, TaskbarButton,
};
use serde::Serialize;

#[derive(Serialize)]
struct RedirectView {
    to: Route,
    page: &'static str,
    after_ms: u64,
}

impl From<&Redirect> for RedirectView {
    fn from(redirect: &Redirect) -> Self {
        RedirectView {
            to: redirect.to,
            page: redirect.to.page(),
            after_ms: redirect.after.as_millis() as u64,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
enum GuardView {
    Allow { route: Route },
    Redirect { route: Route, redirect: RedirectView },
    Deny { route: Route, message: String, redirect: RedirectView },
}

#[derive(Serialize)]
struct HomeView<'a> {
    button: &'a TaskbarButton,
    announcements: &'a [AnnouncementCard],
}

#[derive(Serialize)]
struct StatusView<'a> {
    address: &'a str,
    online: bool,
    text: String,
}

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Output { json }
    }

    fn emit<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("failed to encode output: {}", e),
        }
    }

    pub fn line(&self, text: &str) {
        if !self.json {
            println!("{}", text);
        }
    }

    pub fn notice(&self, notice: &Notice) {
        if self.json {
            return self.emit(notice);
        }
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Error => eprintln!("error: {}", notice.message),
        }
    }

    pub fn redirect(&self, redirect: &Redirect) {
        if self.json {
            return self.emit(&RedirectView::from(redirect));
        }
        if redirect.after.is_zero() {
            println!("-> {}", redirect.to.page());
        } else {
            println!("-> {} in {:?}", redirect.to.page(), redirect.after);
        }
    }

    pub fn login(&self, outcome: &LoginOutcome) {
        if self.json {
            return self.emit(&outcome.session);
        }
        println!(
            "Logged in as {} ({})",
            outcome.session.username, outcome.session.role
        );
        self.redirect(&Redirect::immediate(outcome.landing));
    }

    pub fn whoami(&self, session: Option<&Session>) {
        if self.json {
            return self.emit(&session);
        }
        match session {
            Some(s) => println!(
                "{} ({}) since {}",
                s.username,
                s.role,
                s.logged_in_at.datetime_string()
            ),
            None => println!("Not logged in"),
        }
    }

    pub fn home(&self, button: &TaskbarButton, cards: &[AnnouncementCard], empty: &str) {
        if self.json {
            return self.emit(&HomeView {
                button,
                announcements: cards,
            });
        }
        match &button.action {
            ButtonAction::Navigate { route } => println!("[{}] -> {}", button.label, route.page()),
            ButtonAction::Notify { message } => println!("[{}] {}", button.label, message),
        }
        println!();
        self.announcements(cards, empty);
    }

    pub fn guard(&self, route: Route, decision: &GuardDecision) {
        if self.json {
            let view = match decision {
                GuardDecision::Allow => GuardView::Allow { route },
                GuardDecision::Redirect(r) => GuardView::Redirect {
                    route,
                    redirect: r.into(),
                },
                GuardDecision::Deny { message, redirect } => GuardView::Deny {
                    route,
                    message: message.clone(),
                    redirect: redirect.into(),
                },
            };
            return self.emit(&view);
        }
        match decision {
            GuardDecision::Allow => println!("{}: allowed", route.page()),
            GuardDecision::Redirect(r) => {
                println!("{}: redirected", route.page());
                self.redirect(r);
            }
            GuardDecision::Deny { message, redirect } => {
                eprintln!("error: {}", message);
                self.redirect(redirect);
            }
        }
    }

    pub fn invite_rows(&self, rows: &[InviteCodeRow], empty: &str) {
        if self.json {
            return self.emit(&rows);
        }
        if rows.is_empty() {
            println!("{}", empty);
            return;
        }
        for row in rows {
            let mut line = format!("{:<12} {:<7}", row.code, row.status.label());
            if let Some(info) = &row.used_info {
                line.push(' ');
                line.push_str(info);
            }
            println!("{}", line.trim_end());
        }
    }

    pub fn announcements(&self, cards: &[AnnouncementCard], empty: &str) {
        if self.json {
            return self.emit(&cards);
        }
        if cards.is_empty() {
            println!("{}", empty);
            return;
        }
        for card in cards {
            println!("{}  {}", card.date, card.title);
            println!("    {}", card.content);
        }
    }

    pub fn status(&self, probe: &StatusProbe, status: &ServerStatus) {
        let text = probe.display(status);
        if self.json {
            return self.emit(&StatusView {
                address: probe.address(),
                online: matches!(status, ServerStatus::Online { .. }),
                text,
            });
        }
        println!("{}: {}", probe.address(), text);
    }
}
