use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-facing toast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The user may simply try again.
    pub retryable: bool,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: None,
            retryable: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn restaurant_not_found(slug: &str) -> Self {
        Self::new(NoticeKind::Error, "Restaurant not found")
            .with_description(format!("No restaurant is registered at '{slug}'"))
    }

    pub fn menu_load_failed() -> Self {
        Self::new(NoticeKind::Error, "Error loading menu")
    }

    pub fn added_to_cart(item_name: &str) -> Self {
        Self::new(NoticeKind::Success, "Added to cart").with_description(item_name.to_string())
    }

    pub fn name_required() -> Self {
        Self::new(NoticeKind::Error, "Please enter your name")
    }

    pub fn empty_cart() -> Self {
        Self::new(NoticeKind::Error, "Your cart is empty")
    }

    pub fn total_too_large() -> Self {
        Self::new(NoticeKind::Error, "Order total is too large")
            .with_description("Remove some items and try again")
    }

    pub fn order_sent() -> Self {
        Self::new(NoticeKind::Success, "Order sent to kitchen!")
    }

    pub fn order_failed() -> Self {
        Self {
            retryable: true,
            ..Self::new(NoticeKind::Error, "Failed to place order. Please try again.")
        }
    }
}
