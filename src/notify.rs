use std::collections::VecDeque;

const MAX_PENDING: usize = 5;

pub const RETRY_HINT: &str = "Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Success => "notice-success",
            NoticeLevel::Error => "notice-error",
        }
    }
}

/// A transient message shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

/// Queue of notices waiting to be shown; oldest dropped past the cap.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    pending: VecDeque<Notice>,
}

impl Notices {
    pub fn success(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(NoticeLevel::Success, title.into(), description.into());
    }

    pub fn error(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(NoticeLevel::Error, title.into(), description.into());
    }

    fn push(&mut self, level: NoticeLevel, title: String, description: String) {
        self.pending.push_back(Notice {
            level,
            title,
            description,
        });
        while self.pending.len() > MAX_PENDING {
            self.pending.pop_front();
        }
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.pending.drain(..).collect()
    }

    pub fn peek(&self) -> impl Iterator<Item = &Notice> {
        self.pending.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_queue_in_order() {
        let mut notices = Notices::default();
        notices.success("first", "");
        notices.error("second", RETRY_HINT);
        let drained = notices.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "first");
        assert_eq!(drained[1].level, NoticeLevel::Error);
        assert!(notices.is_empty());
    }

    #[test]
    fn queue_is_capped() {
        let mut notices = Notices::default();
        for i in 0..8 {
            notices.success(format!("n{i}"), "");
        }
        let titles: Vec<String> = notices.peek().map(|notice| notice.title.clone()).collect();
        assert_eq!(titles, vec!["n3", "n4", "n5", "n6", "n7"]);
    }
}
