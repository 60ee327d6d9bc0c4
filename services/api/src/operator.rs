use crate::infra::{collaborators_from_seed, parse_instant};
use chrono::{DateTime, Utc};
use clap::Args;
use merchant_gate::eligibility::{EligibilityService, MerchantId, MerchantVerdict, SeedData};
use merchant_gate::error::AppError;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Merchant seed file (JSON)
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Merchant workspace to evaluate
    #[arg(long, value_parser = parse_merchant_id)]
    pub(crate) merchant_id: MerchantId,
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Merchant seed file (JSON)
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Evaluation instant (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

fn parse_merchant_id(raw: &str) -> Result<MerchantId, String> {
    MerchantId::parse(raw).map_err(|err| format!("'{raw}' is not a merchant UUID ({err})"))
}

/// Operator tool: reads the seed directly, so no session is involved.
pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        seed,
        merchant_id,
        at,
    } = args;

    let (directory, sessions) = collaborators_from_seed(SeedData::from_path(seed)?);
    let service = EligibilityService::new(Arc::new(directory), Arc::new(sessions));
    let now = at.unwrap_or_else(Utc::now);
    let result = service.inspect(&merchant_id, now)?;

    let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs { seed, at, output } = args;

    let (directory, sessions) = collaborators_from_seed(SeedData::from_path(seed)?);
    let service = EligibilityService::new(Arc::new(directory), Arc::new(sessions));
    let now = at.unwrap_or_else(Utc::now);
    let verdicts = service.audit(now)?;

    let rows = report_rows(&verdicts);
    match output {
        Some(path) => write_report(std::fs::File::create(path)?, &rows)?,
        None => write_report(std::io::stdout().lock(), &rows)?,
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReportRow {
    merchant_id: String,
    company_name: String,
    is_eligible: bool,
    reasons: String,
    subscription_status: String,
    compliance_status: String,
    ai_assistant_status: String,
    is_open_now: String,
}

pub(crate) fn report_rows(verdicts: &[MerchantVerdict]) -> Vec<ReportRow> {
    verdicts
        .iter()
        .map(|verdict| {
            let context = verdict.result.context();
            ReportRow {
                merchant_id: verdict.merchant_id.to_string(),
                company_name: verdict.company_name.clone().unwrap_or_default(),
                is_eligible: verdict.result.is_eligible(),
                reasons: verdict.result.reason_codes().join(";"),
                subscription_status: context
                    .subscription_status
                    .map(|status| status.label().to_string())
                    .unwrap_or_default(),
                compliance_status: context
                    .compliance_status
                    .map(|status| status.label().to_string())
                    .unwrap_or_default(),
                ai_assistant_status: context
                    .ai_assistant_status
                    .map(|status| status.label().to_string())
                    .unwrap_or_default(),
                is_open_now: context
                    .is_open_now
                    .map(|open| open.to_string())
                    .unwrap_or_default(),
            }
        })
        .collect()
}

pub(crate) fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), std::io::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()
}
