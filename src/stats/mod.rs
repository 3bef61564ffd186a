//! Statistics core: filter derivation, sorting, and the view model.

pub mod filter;
pub mod sort;
pub mod view_model;

pub use filter::{FilterState, StatsQuery, ViewType, month_name};
pub use sort::{SortColumn, SortDirection, SortState, sort_rows};
pub use view_model::{
    DetailContent, DetailPeriod, DetailRequest, DetailState, MonthBreakdown, StatsGateway,
    StatsViewModel, YearlyAggregate, fetch_filtered_stats, fetch_month_detail, fetch_year_detail,
};
