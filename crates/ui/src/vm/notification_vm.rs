use services::NotificationItem;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationVm {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub icon: &'static str,
    pub time_label: String,
    pub unread: bool,
}

impl From<&NotificationItem> for NotificationVm {
    fn from(item: &NotificationItem) -> Self {
        Self {
            id: item.notification.id.value(),
            title: item.notification.title.clone(),
            message: item.notification.message.clone(),
            icon: item.icon,
            time_label: item.time_label.clone(),
            unread: !item.notification.read,
        }
    }
}

#[must_use]
pub fn map_notifications(items: &[NotificationItem]) -> Vec<NotificationVm> {
    items.iter().map(NotificationVm::from).collect()
}
