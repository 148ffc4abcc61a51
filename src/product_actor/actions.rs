/// Stock operations on a single product, beyond plain CRUD.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes `u32` units out of stock; fails if fewer are available.
    ReserveStock(u32),
    /// Puts `u32` units back into stock.
    RestoreStock(u32),
    /// Signed stock change; fails if the result would be negative.
    AdjustStock(i64),
}

/// Results from ProductActions.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    StockLevel(u32),
    StockChanged { previous: u32, current: u32 },
}
