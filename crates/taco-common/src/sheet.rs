use rustc_hash::FxHashMap;

/// Stable sheet identifier used across the workspace.
///
/// One id names one sheet of one workbook; the workbook is folded in by
/// [`SheetRegistry`] so a [`crate::Range`] stays `Copy`.
pub type SheetId = u16;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SheetKey {
    book: String,
    sheet: String,
}

/// Interns `(book, sheet)` name pairs into [`SheetId`]s.
#[derive(Default, Debug, Clone)]
pub struct SheetRegistry {
    id_by_key: FxHashMap<SheetKey, SheetId>,
    key_by_id: Vec<SheetKey>,
}

impl SheetRegistry {
    pub fn new() -> Self {
        SheetRegistry::default()
    }

    /// Returns the id for `(book, sheet)`, allocating a fresh one on first use.
    ///
    /// # Panics
    /// When more than `u16::MAX + 1` sheets are registered.
    pub fn id_for(&mut self, book: &str, sheet: &str) -> SheetId {
        let key = SheetKey {
            book: book.to_string(),
            sheet: sheet.to_string(),
        };
        if let Some(&id) = self.id_by_key.get(&key) {
            return id;
        }

        let id = SheetId::try_from(self.key_by_id.len()).expect("sheet id space exhausted");
        self.key_by_id.push(key.clone());
        self.id_by_key.insert(key, id);
        id
    }

    pub fn get_id(&self, book: &str, sheet: &str) -> Option<SheetId> {
        self.id_by_key
            .get(&SheetKey {
                book: book.to_string(),
                sheet: sheet.to_string(),
            })
            .copied()
    }

    /// Sheet name for a registered id.
    pub fn name(&self, id: SheetId) -> &str {
        &self.key_by_id[id as usize].sheet
    }

    /// Workbook name for a registered id.
    pub fn book(&self, id: SheetId) -> &str {
        &self.key_by_id[id as usize].book
    }

    pub fn len(&self) -> usize {
        self.key_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_by_id.is_empty()
    }
}
