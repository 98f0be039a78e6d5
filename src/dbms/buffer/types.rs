use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use crate::dbms::storage::{disk::IDiskManager, page::IPage};

use super::replacer::IBufferPoolReplacer;

pub type ReplacerGeneric = Box<dyn IBufferPoolReplacer + Send + Sync>;
pub type DiskManagerGeneric = Box<dyn IDiskManager + Send + Sync>;
pub type PageGeneric = Box<dyn IPage + Send + Sync>;

/// Shared borrow of a resident page, held for as long as the caller reads the
/// page's bytes. The pin on the page outlives the guard and is released
/// separately through `unpin_page`.
pub type ReadOnlyPage<'a> = RwLockReadGuard<'a, PageGeneric>;
/// Exclusive borrow of a resident page, for callers that write its bytes.
pub type WritablePage<'a> = RwLockWriteGuard<'a, PageGeneric>;
