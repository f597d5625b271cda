//! G-code file list panel state.

use hostdeck_core::types::GcodeFile;

/// One slot of the abbreviated pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEntry {
    /// A navigable page, by zero-based index.
    Number(usize),
    Ellipsis,
}

/// View-model for the uploaded files panel.
///
/// Holds the full listing sorted case-insensitively by name; the current
/// page is a pure slice over it. File lists are request/response only, so
/// this panel is not wired into the push fan-out.
#[derive(Debug)]
pub struct FilesVm {
    files: Vec<GcodeFile>,
    page_size: usize,
    pub page: usize,
    /// Selected row within the current page.
    pub selected: usize,
}

impl FilesVm {
    pub fn new(page_size: usize) -> Self {
        Self {
            files: Vec::new(),
            page_size: page_size.max(1),
            page: 0,
            selected: 0,
        }
    }

    /// Replace the listing. Sorts by name, keeps the current page and row
    /// selection in bounds.
    pub fn set_files(&mut self, mut files: Vec<GcodeFile>) {
        files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        self.files = files;
        self.page = self.page.min(self.last_page());
        self.clamp_selection();
    }

    pub fn files(&self) -> &[GcodeFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Zero-based index of the last page. An empty listing has one page.
    pub fn last_page(&self) -> usize {
        if self.files.is_empty() {
            0
        } else {
            (self.files.len() - 1) / self.page_size
        }
    }

    /// The files visible on the current page.
    pub fn page_slice(&self) -> &[GcodeFile] {
        let start = self.page * self.page_size;
        let end = (start + self.page_size).min(self.files.len());
        if start >= end {
            &[]
        } else {
            &self.files[start..end]
        }
    }

    pub fn selected_file(&self) -> Option<&GcodeFile> {
        self.page_slice().get(self.selected)
    }

    /// Abbreviated page list for the pagination bar.
    ///
    /// Up to seven pages are listed in full. Longer listings always show
    /// the first and last page and elide the rest around the current one:
    /// near the start the first five pages, near the end the last five,
    /// otherwise current page and its neighbors between two ellipses.
    pub fn pages(&self) -> Vec<PageEntry> {
        let last = self.last_page();
        let current = self.page;
        let mut pages = Vec::new();

        if last < 7 {
            for i in 0..=last {
                pages.push(PageEntry::Number(i));
            }
            return pages;
        }

        pages.push(PageEntry::Number(0));
        if current < 5 {
            for i in 1..5 {
                pages.push(PageEntry::Number(i));
            }
            pages.push(PageEntry::Ellipsis);
        } else if current > last - 5 {
            pages.push(PageEntry::Ellipsis);
            for i in (last - 4)..last {
                pages.push(PageEntry::Number(i));
            }
        } else {
            pages.push(PageEntry::Ellipsis);
            for i in (current - 1)..=(current + 1) {
                pages.push(PageEntry::Number(i));
            }
            pages.push(PageEntry::Ellipsis);
        }
        pages.push(PageEntry::Number(last));
        pages
    }

    /// Jump to a page. Out-of-range requests are ignored.
    pub fn change_page(&mut self, page: usize) {
        if page <= self.last_page() {
            self.page = page;
            self.clamp_selection();
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.clamp_selection();
        }
    }

    pub fn next_page(&mut self) {
        if self.page < self.last_page() {
            self.page += 1;
            self.clamp_selection();
        }
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let last = self.page_slice().len().saturating_sub(1);
        if self.selected < last {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let last = self.page_slice().len().saturating_sub(1);
        self.selected = self.selected.min(last);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> GcodeFile {
        GcodeFile {
            name: name.to_string(),
            origin: None,
            size: None,
            date: None,
        }
    }

    fn listing(count: usize) -> Vec<GcodeFile> {
        (0..count).map(|i| file(&format!("part{i:03}.gcode"))).collect()
    }

    fn page_numbers(vm: &FilesVm) -> Vec<Option<usize>> {
        vm.pages()
            .iter()
            .map(|entry| match entry {
                PageEntry::Number(n) => Some(*n),
                PageEntry::Ellipsis => None,
            })
            .collect()
    }

    #[test]
    fn test_files_sorted_case_insensitively() {
        let mut vm = FilesVm::new(10);
        vm.set_files(vec![file("Zebra.gcode"), file("alpha.gcode"), file("Beta.gcode")]);

        let names: Vec<_> = vm.files().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha.gcode", "Beta.gcode", "Zebra.gcode"]);
    }

    #[test]
    fn test_page_slice_bounds() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(25));

        assert_eq!(vm.page_slice().len(), 10);
        vm.change_page(2);
        assert_eq!(vm.page_slice().len(), 5);
        assert_eq!(vm.page_slice()[0].name, "part020.gcode");
    }

    #[test]
    fn test_last_page() {
        let mut vm = FilesVm::new(10);
        assert_eq!(vm.last_page(), 0);

        vm.set_files(listing(10));
        assert_eq!(vm.last_page(), 0);
        vm.set_files(listing(11));
        assert_eq!(vm.last_page(), 1);
        vm.set_files(listing(70));
        assert_eq!(vm.last_page(), 6);
    }

    #[test]
    fn test_short_listing_shows_every_page() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(65));

        assert_eq!(
            page_numbers(&vm),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
        );
    }

    #[test]
    fn test_pagination_near_start() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(100));
        vm.change_page(3);

        assert_eq!(
            page_numbers(&vm),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), None, Some(9)]
        );
    }

    #[test]
    fn test_pagination_near_end() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(100));
        vm.change_page(7);

        assert_eq!(
            page_numbers(&vm),
            vec![Some(0), None, Some(5), Some(6), Some(7), Some(8), Some(9)]
        );
    }

    #[test]
    fn test_pagination_middle() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(120));
        vm.change_page(5);

        assert_eq!(
            page_numbers(&vm),
            vec![Some(0), None, Some(4), Some(5), Some(6), None, Some(11)]
        );
    }

    #[test]
    fn test_change_page_ignores_out_of_range() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(25));

        vm.change_page(7);
        assert_eq!(vm.page, 0);
        vm.change_page(2);
        assert_eq!(vm.page, 2);
    }

    #[test]
    fn test_shrinking_listing_clamps_page_and_selection() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(25));
        vm.change_page(2);
        vm.select_down();
        vm.select_down();

        vm.set_files(listing(5));
        assert_eq!(vm.page, 0);
        assert!(vm.selected < vm.page_slice().len());
    }

    #[test]
    fn test_selection_moves_within_page() {
        let mut vm = FilesVm::new(10);
        vm.set_files(listing(3));

        vm.select_down();
        vm.select_down();
        vm.select_down();
        assert_eq!(vm.selected, 2);
        assert_eq!(vm.selected_file().unwrap().name, "part002.gcode");

        vm.select_up();
        assert_eq!(vm.selected, 1);
    }

    #[test]
    fn test_empty_listing() {
        let vm = FilesVm::new(10);
        assert!(vm.page_slice().is_empty());
        assert!(vm.selected_file().is_none());
        assert_eq!(page_numbers(&vm), vec![Some(0)]);
    }
}
