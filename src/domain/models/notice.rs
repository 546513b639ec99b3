#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// The single user-facing message slot. A new notice always replaces the
/// previous one, success or failure alike.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: &str) -> Notice {
        return Notice {
            kind: NoticeKind::Success,
            text: text.to_string(),
        };
    }

    pub fn error(text: &str) -> Notice {
        return Notice {
            kind: NoticeKind::Error,
            text: text.to_string(),
        };
    }
}
