use dioxus::prelude::*;

const INFO_TIMEOUT_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// Banner at the top of the page. Errors stay until dismissed; info fades.
#[component]
pub fn Toast(notice: Signal<Option<Notice>>) -> Element {
    let current = notice.read().clone();

    use_effect(move || {
        let Some(n) = notice.read().clone() else {
            return;
        };
        if n.kind == NoticeKind::Info {
            spawn(async move {
                gloo_timers::future::TimeoutFuture::new(INFO_TIMEOUT_MS).await;
                // only clear if nothing newer replaced it
                if notice.peek().as_ref() == Some(&n) {
                    notice.set(None);
                }
            });
        }
    });

    let Some(n) = current else {
        return rsx! {};
    };
    let class = match n.kind {
        NoticeKind::Info => "toast info",
        NoticeKind::Error => "toast error",
    };

    rsx! {
        div { class: "{class}", role: "alert",
            span { "{n.message}" }
            button {
                class: "toast-close",
                "aria-label": "Dismiss",
                onclick: move |_| notice.set(None),
                "×"
            }
        }
    }
}
