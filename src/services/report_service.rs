use serde::Serialize;
use sqlx::SqlitePool;

use crate::database::models::{SavingsRow, SpendRow};
use crate::services::ServiceError;
use crate::workflow::RequestStatus;

#[derive(Debug, Serialize)]
pub struct SavingsLine {
    #[serde(flatten)]
    pub row: SavingsRow,
    pub savings: f64,
}

/// Cost reductions negotiated by SAC
#[derive(Debug, Serialize)]
pub struct SavingsReport {
    pub rows: Vec<SavingsLine>,
    pub total_savings: f64,
}

/// Committed spend for one department
#[derive(Debug, Serialize)]
pub struct SpendReport {
    pub department: String,
    pub rows: Vec<SpendRow>,
    pub total: f64,
}

pub struct ReportService {
    pool: SqlitePool,
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl ReportService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn savings(&self) -> Result<SavingsReport, ServiceError> {
        let sql = format!(
            "SELECT id, date, item, vendor, initial_cost, amount, sac_note FROM requests
             WHERE initial_cost > amount AND status IN ({})
             ORDER BY date, rowid",
            placeholders(RequestStatus::REVIEWED.len())
        );
        let mut query = sqlx::query_as::<_, SavingsRow>(&sql);
        for status in RequestStatus::REVIEWED {
            query = query.bind(status.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;

        let rows: Vec<SavingsLine> = rows
            .into_iter()
            .map(|row| SavingsLine {
                savings: row.savings(),
                row,
            })
            .collect();
        let total_savings = rows.iter().map(|line| line.savings).sum();

        Ok(SavingsReport { rows, total_savings })
    }

    pub async fn savings_csv(&self) -> Result<String, ServiceError> {
        Ok(savings_to_csv(&self.savings().await?))
    }

    pub async fn spend(&self, department: &str) -> Result<SpendReport, ServiceError> {
        let sql = format!(
            "SELECT id, date, item, vendor, amount, status FROM requests
             WHERE department = ? AND status IN ({})
             ORDER BY date, rowid",
            placeholders(RequestStatus::SPENT.len())
        );
        let mut query = sqlx::query_as::<_, SpendRow>(&sql).bind(department);
        for status in RequestStatus::SPENT {
            query = query.bind(status.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;
        let total = rows.iter().map(|row| row.amount).sum();

        Ok(SpendReport {
            department: department.to_string(),
            rows,
            total,
        })
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn savings_to_csv(report: &SavingsReport) -> String {
    let mut out = String::from("Date,Item,Vendor,Initial,Final,Note,Savings\n");
    for line in &report.rows {
        let row = &line.row;
        let fields = [
            csv_field(&row.date),
            csv_field(&row.item),
            csv_field(&row.vendor),
            format!("{:.2}", row.initial_cost),
            format!("{:.2}", row.amount),
            csv_field(&row.sac_note),
            format!("{:.2}", line.savings),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}
