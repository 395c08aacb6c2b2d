/// 單一聊天的選單路徑：底層永遠是主選單
#[derive(Debug, Clone)]
pub struct NavigationState {
    stack: Vec<String>,
}

impl NavigationState {
    pub fn new(root_label: &str) -> Self {
        Self {
            stack: vec![root_label.to_string()],
        }
    }

    pub fn current(&self) -> &str {
        self.stack.last().map(|s| s.as_str()).unwrap_or_default()
    }

    pub fn enter(&mut self, label: &str) {
        self.stack.push(label.to_string());
    }

    /// 回上一層；已在主選單時停在原地
    pub fn back(&mut self) -> &str {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }

    pub fn home(&mut self) -> &str {
        self.stack.truncate(1);
        self.current()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_root() {
        let nav = NavigationState::new("start");
        assert_eq!(nav.current(), "start");
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_enter_and_back() {
        let mut nav = NavigationState::new("start");
        nav.enter("services");
        nav.enter("gift-cards");
        assert_eq!(nav.current(), "gift-cards");

        assert_eq!(nav.back(), "services");
        assert_eq!(nav.back(), "start");
        // 主選單再退還是主選單
        assert_eq!(nav.back(), "start");
    }

    #[test]
    fn test_home_resets_to_root() {
        let mut nav = NavigationState::new("start");
        nav.enter("services");
        nav.enter("gift-cards");
        nav.enter("Steam");

        assert_eq!(nav.home(), "start");
        assert_eq!(nav.depth(), 1);
    }
}
