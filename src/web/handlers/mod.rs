// storefront/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod expedition_handlers;
pub mod order_handlers;
pub mod product_handlers;

// Shared paging defaults for list endpoints.
pub(crate) const DEFAULT_PAGE_LIMIT: i64 = 10;
pub(crate) const MAX_PAGE_LIMIT: i64 = 100;

pub(crate) fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
  let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
  let offset = offset.unwrap_or(0).max(0);
  (limit, offset)
}
