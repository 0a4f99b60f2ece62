use std::ops::RangeInclusive;

pub const MAX_VISIBLE_PAGES: u32 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total: u32,
    pub pages: RangeInclusive<u32>,
}

impl PageWindow {
    /// `None` when there is at most one page: no controls are shown.
    pub fn new(current: u32, total: u32) -> Option<Self> {
        if total <= 1 {
            return None;
        }
        let current = current.clamp(1, total);

        let mut start = current.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
        let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
        if end - start < MAX_VISIBLE_PAGES - 1 {
            start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
        }

        Some(PageWindow {
            current,
            total,
            pages: start..=end,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn previous(&self) -> u32 {
        self.current.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> u32 {
        (self.current + 1).min(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(window: &PageWindow) -> Vec<u32> {
        window.pages.clone().collect()
    }

    #[test]
    fn first_page_of_many() {
        let window = PageWindow::new(1, 20).unwrap();
        assert_eq!(pages(&window), vec![1, 2, 3, 4, 5]);
        assert!(!window.has_previous());
        assert!(window.has_next());
    }

    #[test]
    fn last_page_of_many() {
        let window = PageWindow::new(20, 20).unwrap();
        assert_eq!(pages(&window), vec![16, 17, 18, 19, 20]);
        assert!(window.has_previous());
        assert!(!window.has_next());
    }

    #[test]
    fn window_is_centred_in_the_middle() {
        let window = PageWindow::new(10, 20).unwrap();
        assert_eq!(pages(&window), vec![8, 9, 10, 11, 12]);
        assert_eq!(window.previous(), 9);
        assert_eq!(window.next(), 11);
    }

    #[test]
    fn near_the_edges_the_window_shifts_inward() {
        assert_eq!(pages(&PageWindow::new(2, 20).unwrap()), vec![1, 2, 3, 4, 5]);
        assert_eq!(pages(&PageWindow::new(19, 20).unwrap()), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn fewer_pages_than_the_window() {
        let window = PageWindow::new(2, 3).unwrap();
        assert_eq!(pages(&window), vec![1, 2, 3]);
    }

    #[test]
    fn single_or_no_page_hides_controls() {
        assert!(PageWindow::new(1, 1).is_none());
        assert!(PageWindow::new(1, 0).is_none());
    }
}
