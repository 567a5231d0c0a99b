//! Reporting service.
//!
//! Every window is computed from an explicit `now`, so results are
//! deterministic under test.

use chrono::{DateTime, Days, NaiveTime, Utc};
use sqlx::PgPool;

use tally_core::SaleId;

use crate::db::{ReportRepository, RepositoryError, SaleRepository};
use crate::models::{Dashboard, Product, ProductSales, Sale, SaleDetail, SalesSummary};

/// Rows shown in the dashboard's top-seller and low-stock lists.
pub const DASHBOARD_LIMIT: i64 = 10;

/// A reporting window ending at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportWindow {
    /// Since midnight UTC today.
    Daily,
    /// Since midnight UTC seven days ago.
    Weekly,
    /// Since midnight UTC thirty days ago.
    Monthly,
}

impl ReportWindow {
    const fn days_back(self) -> u64 {
        match self {
            Self::Daily => 0,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// Inclusive lower bound of the window.
    #[must_use]
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let first_day = today
            .checked_sub_days(Days::new(self.days_back()))
            .unwrap_or(today);
        first_day.and_time(NaiveTime::MIN).and_utc()
    }

    /// Heading used on the sale listing pages.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Daily => "Today's Sales",
            Self::Weekly => "Sales This Week",
            Self::Monthly => "Sales This Month",
        }
    }
}

/// Reporting service.
pub struct ReportService<'a> {
    reports: ReportRepository<'a>,
    sales: SaleRepository<'a>,
}

impl<'a> ReportService<'a> {
    /// Create a new reporting service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            reports: ReportRepository::new(pool),
            sales: SaleRepository::new(pool),
        }
    }

    /// Total and count of sales in a window ending at `now`.
    ///
    /// Sales stamped after `now` are left out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn summary(
        &self,
        window: ReportWindow,
        now: DateTime<Utc>,
    ) -> Result<SalesSummary, RepositoryError> {
        self.reports.summary_between(window.start(now), now).await
    }

    /// Best sellers by units sold.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn top_products(&self, limit: i64) -> Result<Vec<ProductSales>, RepositoryError> {
        self.reports.top_products(limit).await
    }

    /// Products with the least stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn low_stock(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        self.reports.low_stock(limit).await
    }

    /// Sales inside a window, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn sales_in(
        &self,
        window: ReportWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sale>, RepositoryError> {
        self.sales.list_between(window.start(now), now).await
    }

    /// All sales, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list_sales(&self) -> Result<Vec<Sale>, RepositoryError> {
        self.sales.list_all().await
    }

    /// A sale with its line items, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn sale_detail(&self, id: SaleId) -> Result<Option<SaleDetail>, RepositoryError> {
        let Some(sale) = self.sales.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.sales.lines(id).await?;

        Ok(Some(SaleDetail { sale, items }))
    }

    /// Everything the dashboard shows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if any query fails.
    #[tracing::instrument(skip(self))]
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<Dashboard, RepositoryError> {
        Ok(Dashboard {
            daily: self.summary(ReportWindow::Daily, now).await?,
            weekly: self.summary(ReportWindow::Weekly, now).await?,
            monthly: self.summary(ReportWindow::Monthly, now).await?,
            top_products: self.top_products(DASHBOARD_LIMIT).await?,
            low_stock: self.low_stock(DASHBOARD_LIMIT).await?,
        })
    }
}
