use thiserror::Error;

use crate::dbms::types::{PageData, PageId, PAGE_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    /// Attempted to decrement a pin count that is already zero
    #[error("page pin count is already zero")]
    PinCountUnderflow,
}

/// A single buffer frame's contents: one disk page's bytes plus the metadata
/// the pool keeps per frame. An empty frame has no page id, a zeroed data
/// buffer, a pin count of zero and a clear dirty flag.
///
/// Thread safety is the pool's concern; every frame sits behind its own
/// reader/writer latch and all mutation happens under that latch.
pub trait IPage {
    /// The disk page currently resident in this frame, `None` if the frame is
    /// empty.
    fn get_page_id(&self) -> Result<Option<PageId>, PageError>;
    /// Copy of the page's bytes.
    fn get_data(&self) -> Result<PageData, PageError>;
    /// Mutable access to the page's bytes. Writing through this does not mark
    /// the page dirty; durability is declared at unpin time.
    fn get_data_mut(&mut self) -> Result<&mut PageData, PageError>;
    /// Install a page into this frame: set the id and bytes, pin count 1,
    /// dirty flag clear.
    fn overwrite(&mut self, page_id: Option<PageId>, data: PageData) -> Result<(), PageError>;
    /// Wipe the frame back to empty: zero the bytes, drop the page id, pin
    /// count 0, dirty flag clear.
    fn reset(&mut self) -> Result<(), PageError>;
    fn get_pin_count(&self) -> Result<usize, PageError>;
    fn increase_pin_count(&mut self) -> Result<(), PageError>;
    fn decrease_pin_count(&mut self) -> Result<(), PageError>;
    fn is_dirty(&self) -> Result<bool, PageError>;
    fn set_dirty(&mut self) -> Result<(), PageError>;
    fn set_clean(&mut self) -> Result<(), PageError>;
}

pub struct Page {
    page_id: Option<PageId>,
    data: PageData,
    pin_count: usize,
    is_dirty: bool,
}

impl Page {
    pub fn new(page_id: Option<PageId>) -> Self {
        Self {
            page_id,
            data: [0; PAGE_SIZE],
            pin_count: 0,
            is_dirty: false,
        }
    }
}

impl IPage for Page {
    fn get_page_id(&self) -> Result<Option<PageId>, PageError> {
        Ok(self.page_id)
    }

    fn get_data(&self) -> Result<PageData, PageError> {
        Ok(self.data)
    }

    fn get_data_mut(&mut self) -> Result<&mut PageData, PageError> {
        Ok(&mut self.data)
    }

    fn overwrite(&mut self, page_id: Option<PageId>, data: PageData) -> Result<(), PageError> {
        self.page_id = page_id;
        self.data = data;
        self.pin_count = 1;
        self.is_dirty = false;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), PageError> {
        self.page_id = None;
        self.data = [0; PAGE_SIZE];
        self.pin_count = 0;
        self.is_dirty = false;
        Ok(())
    }

    fn get_pin_count(&self) -> Result<usize, PageError> {
        Ok(self.pin_count)
    }

    fn increase_pin_count(&mut self) -> Result<(), PageError> {
        self.pin_count += 1;
        Ok(())
    }

    fn decrease_pin_count(&mut self) -> Result<(), PageError> {
        if self.pin_count == 0 {
            return Err(PageError::PinCountUnderflow);
        }
        self.pin_count -= 1;
        Ok(())
    }

    fn is_dirty(&self) -> Result<bool, PageError> {
        Ok(self.is_dirty)
    }

    fn set_dirty(&mut self) -> Result<(), PageError> {
        self.is_dirty = true;
        Ok(())
    }

    fn set_clean(&mut self) -> Result<(), PageError> {
        self.is_dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_page_is_empty() {
        let page = Page::new(None);
        assert_eq!(page.get_page_id(), Ok(None));
        assert_eq!(page.get_pin_count(), Ok(0));
        assert_eq!(page.is_dirty(), Ok(false));
        assert!(page.get_data().unwrap().iter().all(|b| *b == 0));
    }

    #[rstest]
    fn test_overwrite_installs_page() {
        let mut page = Page::new(None);
        let mut data = [0u8; PAGE_SIZE];
        data[..5].copy_from_slice(b"Hello");

        page.overwrite(Some(7), data).unwrap();

        assert_eq!(page.get_page_id(), Ok(Some(7)));
        assert_eq!(page.get_pin_count(), Ok(1));
        assert_eq!(page.is_dirty(), Ok(false));
        assert_eq!(&page.get_data().unwrap()[..5], b"Hello");
    }

    #[rstest]
    fn test_data_writes_do_not_dirty() {
        let mut page = Page::new(Some(0));
        page.get_data_mut().unwrap()[..5].copy_from_slice(b"Hello");
        assert_eq!(page.is_dirty(), Ok(false));
        assert_eq!(&page.get_data().unwrap()[..5], b"Hello");
    }

    #[rstest]
    fn test_reset_wipes_everything() {
        let mut page = Page::new(None);
        let mut data = [0u8; PAGE_SIZE];
        data[123] = 45;
        page.overwrite(Some(3), data).unwrap();
        page.set_dirty().unwrap();

        page.reset().unwrap();

        assert_eq!(page.get_page_id(), Ok(None));
        assert_eq!(page.get_pin_count(), Ok(0));
        assert_eq!(page.is_dirty(), Ok(false));
        assert!(page.get_data().unwrap().iter().all(|b| *b == 0));
    }

    #[rstest]
    fn test_pin_count_round_trip() {
        let mut page = Page::new(Some(0));
        page.increase_pin_count().unwrap();
        page.increase_pin_count().unwrap();
        assert_eq!(page.get_pin_count(), Ok(2));
        page.decrease_pin_count().unwrap();
        page.decrease_pin_count().unwrap();
        assert_eq!(page.get_pin_count(), Ok(0));
    }

    #[rstest]
    fn test_pin_count_cannot_go_negative() {
        let mut page = Page::new(Some(0));
        assert_eq!(
            page.decrease_pin_count(),
            Err(PageError::PinCountUnderflow)
        );
    }

    #[rstest]
    fn test_dirty_flag_round_trip() {
        let mut page = Page::new(Some(0));
        page.set_dirty().unwrap();
        assert_eq!(page.is_dirty(), Ok(true));
        page.set_clean().unwrap();
        assert_eq!(page.is_dirty(), Ok(false));
    }
}
