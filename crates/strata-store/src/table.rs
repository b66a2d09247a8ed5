//! Row/column table storage over type-erased buffers.
//!
//! A [`Table`] is a collection of rows, each an [`ErasedVec`] with its own
//! element type, sharing one set of columns. Columns are positions kept in
//! lockstep across every row and addressed through their own key domain, so
//! a [`ColumnKey`] stays valid across column removals even though the
//! underlying positions reorder.

use bytemuck::Pod;
use strata_core::Key;

use crate::erased::ErasedVec;
use crate::error::{SlotError, TableError};
use crate::map::SlotMap;
use crate::slot::SlotAllocator;

/// Key domain marker for table rows.
pub struct RowTag;

/// Key domain marker for table columns.
pub struct ColumnTag;

/// Key addressing a row of a [`Table`].
pub type RowKey = Key<RowTag>;

/// Key addressing a column of a [`Table`].
pub type ColumnKey = Key<ColumnTag>;

/// Two-dimensional storage: typed rows × key-addressed columns.
///
/// Invariant: every row holds exactly one cell per live column, and cell
/// position `j` is the same column in every row. All operations that grow
/// or shrink columns apply to every row before returning.
///
/// # Positional stability
///
/// [`remove_column`](Self::remove_column) swap-removes the vacated position
/// in every row, which reorders the remaining columns' positions. This is
/// deliberate: raw positional indices held across a column removal silently
/// point at a different column. Only key-addressed access (via
/// [`ColumnKey`]) is stable — that is the contract, not a caveat.
///
/// ```
/// use strata_store::Table;
///
/// let mut table = Table::new();
/// let row = table.create_row::<i32>().unwrap();
/// let col = table.create_column().unwrap();
/// *table.cell_mut::<i32>(row, col).unwrap() = 41;
/// assert_eq!(*table.cell::<i32>(row, col).unwrap(), 41);
/// ```
pub struct Table {
    columns: SlotAllocator<ColumnTag>,
    rows: SlotMap<ErasedVec, RowTag>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            columns: SlotAllocator::new(),
            rows: SlotMap::new(),
        }
    }

    /// Add a row of element type `T`, pre-sized to the live column count.
    ///
    /// All cells start zeroed.
    pub fn create_row<T: Pod>(&mut self) -> Result<RowKey, SlotError> {
        let mut row = ErasedVec::of::<T>();
        row.resize(self.columns.len());
        self.rows.insert(row)
    }

    /// Remove a row and drop its buffer. Returns whether the row existed.
    pub fn remove_row(&mut self, key: RowKey) -> bool {
        self.rows.remove(key).is_ok()
    }

    /// Add a column, growing every row by one zeroed cell.
    pub fn create_column(&mut self) -> Result<ColumnKey, SlotError> {
        let key = self.columns.allocate()?;
        for row in &mut self.rows {
            row.push_zeroed();
        }
        Ok(key)
    }

    /// Remove a column, swap-removing its cell from every row.
    ///
    /// Returns `false` if the key is stale or unknown. Every row is
    /// reordered identically, so key-addressed access to the remaining
    /// columns is unaffected; raw positions are not (see the type docs).
    pub fn remove_column(&mut self, key: ColumnKey) -> bool {
        let Some(position) = self.columns.release(key) else {
            return false;
        };
        for row in &mut self.rows {
            row.swap_remove(position)
                .expect("every row has one cell per live column");
        }
        true
    }

    /// Whether `key` refers to a live row.
    pub fn contains_row(&self, key: RowKey) -> bool {
        self.rows.contains(key)
    }

    /// Whether `key` refers to a live column.
    pub fn contains_column(&self, key: ColumnKey) -> bool {
        self.columns.contains(key)
    }

    /// A typed view of a row.
    ///
    /// Fails with [`TableError::UnknownRow`] for a stale key and
    /// `TypeMismatch` if the row is bound to an element type other than `T`.
    pub fn row<T: Pod>(&self, key: RowKey) -> Result<RowRef<'_, T>, TableError> {
        let row = self.rows.get(key).ok_or(TableError::UnknownRow)?;
        let cells = row.as_slice::<T>()?;
        Ok(RowRef {
            cells,
            columns: &self.columns,
        })
    }

    /// A typed mutable view of a row.
    pub fn row_mut<T: Pod>(&mut self, key: RowKey) -> Result<RowMut<'_, T>, TableError> {
        let Self { columns, rows } = self;
        let row = rows.get_mut(key).ok_or(TableError::UnknownRow)?;
        let cells = row.as_mut_slice::<T>()?;
        Ok(RowMut { cells, columns })
    }

    /// The cell at (`row`, `column`).
    pub fn cell<T: Pod>(&self, row: RowKey, column: ColumnKey) -> Result<&T, TableError> {
        let buffer = self.rows.get(row).ok_or(TableError::UnknownRow)?;
        let position = self
            .columns
            .resolve(column)
            .ok_or(TableError::UnknownColumn)?;
        Ok(buffer.get(position)?)
    }

    /// The cell at (`row`, `column`), mutably.
    pub fn cell_mut<T: Pod>(
        &mut self,
        row: RowKey,
        column: ColumnKey,
    ) -> Result<&mut T, TableError> {
        let Self { columns, rows } = self;
        let buffer = rows.get_mut(row).ok_or(TableError::UnknownRow)?;
        let position = columns.resolve(column).ok_or(TableError::UnknownColumn)?;
        Ok(buffer.get_mut(position)?)
    }

    /// Live column keys in dense order.
    ///
    /// Dense order matches the current cell positions within every row.
    pub fn columns(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.columns.keys()
    }

    /// Live row keys in dense order.
    pub fn rows(&self) -> impl Iterator<Item = RowKey> + '_ {
        self.rows.keys()
    }

    /// Number of live columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of live rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// A typed shared view of one table row.
pub struct RowRef<'a, T> {
    cells: &'a [T],
    columns: &'a SlotAllocator<ColumnTag>,
}

impl<'a, T: Pod> RowRef<'a, T> {
    /// The cell for `column`, or `None` if the column key is stale.
    pub fn get(&self, column: ColumnKey) -> Option<&'a T> {
        let position = self.columns.resolve(column)?;
        Some(&self.cells[position])
    }

    /// All cells in current positional order.
    ///
    /// Positions reorder on column removal; prefer [`get`](Self::get) for
    /// anything held across mutations.
    pub fn cells(&self) -> &'a [T] {
        self.cells
    }

    /// Number of cells (equals the table's live column count).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A typed mutable view of one table row.
pub struct RowMut<'a, T> {
    cells: &'a mut [T],
    columns: &'a SlotAllocator<ColumnTag>,
}

impl<T: Pod> RowMut<'_, T> {
    /// The cell for `column`.
    pub fn get(&self, column: ColumnKey) -> Option<&T> {
        let position = self.columns.resolve(column)?;
        Some(&self.cells[position])
    }

    /// The cell for `column`, mutably.
    pub fn get_mut(&mut self, column: ColumnKey) -> Option<&mut T> {
        let position = self.columns.resolve(column)?;
        Some(&mut self.cells[position])
    }

    /// Write `value` into the cell for `column`; returns whether the
    /// column key was live.
    pub fn set(&mut self, column: ColumnKey, value: T) -> bool {
        match self.get_mut(column) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// All cells in current positional order, mutably.
    pub fn cells_mut(&mut self) -> &mut [T] {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BufferError;

    #[test]
    fn cells_survive_column_removal_via_keys() {
        let mut table = Table::new();
        let row = table.create_row::<i32>().unwrap();
        let c0 = table.create_column().unwrap();
        let c1 = table.create_column().unwrap();
        let c2 = table.create_column().unwrap();

        {
            let mut view = table.row_mut::<i32>(row).unwrap();
            assert!(view.set(c1, 5));
            assert!(view.set(c2, 7));
        }

        assert!(table.remove_column(c0));

        let view = table.row::<i32>(row).unwrap();
        assert_eq!(view.len(), 2);
        assert_eq!(view.get(c1), Some(&5));
        assert_eq!(view.get(c2), Some(&7));
        assert_eq!(view.get(c0), None);
    }

    #[test]
    fn create_then_remove_column_restores_cell_counts() {
        let mut table = Table::new();
        let row_a = table.create_row::<u64>().unwrap();
        let row_b = table.create_row::<f32>().unwrap();
        let keep = table.create_column().unwrap();

        let fleeting = table.create_column().unwrap();
        assert_eq!(table.row::<u64>(row_a).unwrap().len(), 2);
        assert!(table.remove_column(fleeting));

        assert_eq!(table.row::<u64>(row_a).unwrap().len(), 1);
        assert_eq!(table.row::<f32>(row_b).unwrap().len(), 1);
        // The surviving column still resolves in every row.
        assert!(table.row::<u64>(row_a).unwrap().get(keep).is_some());
        assert!(table.row::<f32>(row_b).unwrap().get(keep).is_some());
    }

    #[test]
    fn new_row_matches_current_column_count() {
        let mut table = Table::new();
        table.create_column().unwrap();
        table.create_column().unwrap();
        let row = table.create_row::<u8>().unwrap();
        assert_eq!(table.row::<u8>(row).unwrap().len(), 2);
        // Cells of a fresh row start zeroed.
        assert_eq!(table.row::<u8>(row).unwrap().cells(), &[0, 0]);
    }

    #[test]
    fn rows_of_differing_types_grow_in_lockstep() {
        let mut table = Table::new();
        let ints = table.create_row::<i32>().unwrap();
        let floats = table.create_row::<f64>().unwrap();
        let col = table.create_column().unwrap();

        *table.cell_mut::<i32>(ints, col).unwrap() = -3;
        *table.cell_mut::<f64>(floats, col).unwrap() = 0.5;

        assert_eq!(*table.cell::<i32>(ints, col).unwrap(), -3);
        assert_eq!(*table.cell::<f64>(floats, col).unwrap(), 0.5);
    }

    #[test]
    fn row_view_rejects_wrong_type() {
        let mut table = Table::new();
        let row = table.create_row::<i32>().unwrap();
        assert!(matches!(
            table.row::<f32>(row),
            Err(TableError::Buffer(BufferError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn stale_keys_are_reported_distinctly() {
        let mut table = Table::new();
        let row = table.create_row::<i32>().unwrap();
        let col = table.create_column().unwrap();

        assert!(table.remove_row(row));
        assert!(!table.remove_row(row));
        assert!(matches!(
            table.cell::<i32>(row, col),
            Err(TableError::UnknownRow)
        ));

        let row = table.create_row::<i32>().unwrap();
        assert!(table.remove_column(col));
        assert!(!table.remove_column(col));
        assert!(matches!(
            table.cell::<i32>(row, col),
            Err(TableError::UnknownColumn)
        ));
    }

    #[test]
    fn removing_a_row_leaves_others_intact() {
        let mut table = Table::new();
        let a = table.create_row::<u32>().unwrap();
        let b = table.create_row::<u32>().unwrap();
        let col = table.create_column().unwrap();
        *table.cell_mut::<u32>(b, col).unwrap() = 11;

        assert!(table.remove_row(a));
        assert_eq!(table.row_count(), 1);
        assert_eq!(*table.cell::<u32>(b, col).unwrap(), 11);
    }

    #[test]
    fn column_iteration_matches_positions() {
        let mut table = Table::new();
        let row = table.create_row::<u32>().unwrap();
        let c0 = table.create_column().unwrap();
        let c1 = table.create_column().unwrap();
        let c2 = table.create_column().unwrap();

        {
            let mut view = table.row_mut::<u32>(row).unwrap();
            for (i, col) in [c0, c1, c2].into_iter().enumerate() {
                view.set(col, i as u32 * 10);
            }
        }
        table.remove_column(c0);

        // Enumerating columns in dense order and reading positionally
        // agrees with key-addressed access.
        let cols: Vec<_> = table.columns().collect();
        assert_eq!(cols.len(), 2);
        let view = table.row::<u32>(row).unwrap();
        for (position, col) in cols.into_iter().enumerate() {
            assert_eq!(view.get(col), Some(&view.cells()[position]));
        }
    }

    #[test]
    fn many_columns_and_rows_stay_aligned() {
        let mut table = Table::new();
        let rows: Vec<_> = (0..4).map(|_| table.create_row::<u16>().unwrap()).collect();
        let cols: Vec<_> = (0..8).map(|_| table.create_column().unwrap()).collect();

        for (ri, &row) in rows.iter().enumerate() {
            let mut view = table.row_mut::<u16>(row).unwrap();
            for (ci, &col) in cols.iter().enumerate() {
                view.set(col, (ri * 100 + ci) as u16);
            }
        }

        // Remove every other column; all surviving cells keep their values.
        for col in cols.iter().step_by(2) {
            assert!(table.remove_column(*col));
        }
        for (ri, &row) in rows.iter().enumerate() {
            let view = table.row::<u16>(row).unwrap();
            assert_eq!(view.len(), 4);
            for (ci, &col) in cols.iter().enumerate() {
                if ci % 2 == 0 {
                    assert_eq!(view.get(col), None);
                } else {
                    assert_eq!(view.get(col), Some(&((ri * 100 + ci) as u16)));
                }
            }
        }
    }
}
