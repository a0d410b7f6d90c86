//! Liquidation-report-related definitions.

use common::Date;
use juniper::{GraphQLEnum, GraphQLInputObject, GraphQLObject};
use service::query::report::liquidation;

use crate::{api, Context};

/// Filter of a liquidation report.
#[derive(Clone, Debug, GraphQLInputObject)]
pub struct Filter {
    /// Report year.
    pub year: i32,

    /// Report month (1..=12). Absent requests the annual mode covering all
    /// 12 months.
    pub month: Option<i32>,

    /// Restricts the report to one `Contractor`.
    pub contractor_id: Option<api::contractor::Id>,

    /// Restricts the report to one movement kind.
    pub kind: Option<MovementKind>,

    /// Lower bound (inclusive) on movement dates.
    pub from: Option<Date>,

    /// Upper bound (inclusive) on movement dates.
    pub to: Option<Date>,
}

impl Filter {
    /// Converts this [`Filter`] into the service-level one.
    ///
    /// [`None`] is returned if the month is out of the `1..=12` range.
    pub(crate) fn into_service(self) -> Option<liquidation::Filter> {
        let Self {
            year,
            month,
            contractor_id,
            kind,
            from,
            to,
        } = self;

        let month = match month {
            Some(m) => Some(u8::try_from(m).ok().filter(|m| (1..=12).contains(m))?),
            None => None,
        };

        Some(liquidation::Filter {
            year,
            month,
            contractor: contractor_id.map(Into::into),
            kind: kind.map(Into::into),
            from,
            to,
        })
    }
}

/// Kind of a liquidation movement.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum MovementKind {
    /// A `Member` was admitted.
    Admission,

    /// A `Member` was terminated.
    Termination,

    /// A `Member` was reassigned between `Contractor`s.
    ContractorChange,
}

impl From<MovementKind> for liquidation::MovementKind {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::Admission => Self::Admission,
            MovementKind::Termination => Self::Termination,
            MovementKind::ContractorChange => Self::ContractorChange,
        }
    }
}

impl From<liquidation::MovementKind> for MovementKind {
    fn from(kind: liquidation::MovementKind) -> Self {
        match kind {
            liquidation::MovementKind::Admission => Self::Admission,
            liquidation::MovementKind::Termination => Self::Termination,
            liquidation::MovementKind::ContractorChange => {
                Self::ContractorChange
            }
        }
    }
}

/// Liquidation report over one period.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Report {
    /// Report year.
    pub year: i32,

    /// Report month, absent in annual mode.
    pub month: Option<i32>,

    /// Filtered movements, ascending by date.
    pub movements: Vec<Movement>,

    /// Per-contractor monthly summaries; months with no movements are
    /// absent.
    pub summaries: Vec<MonthlySummary>,

    /// Total count of admissions across the filtered movements.
    pub total_admissions: i32,

    /// Total count of terminations across the filtered movements.
    pub total_terminations: i32,

    /// Total count of transfers into contractors.
    pub total_transfers_in: i32,

    /// Total count of transfers out of contractors.
    pub total_transfers_out: i32,

    /// Net movement balance across the filtered movements.
    pub net_balance: i32,

    /// Count of `Member`s active at the first day of the period.
    pub active_at_start: i32,

    /// Count of `Member`s active at the last day of the period.
    pub active_at_end: i32,

    /// Flat CSV export of the report.
    pub csv: String,
}

/// One movement of one `Member`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Movement {
    /// `Member` that moved.
    pub member_id: api::member::Id,

    /// Kind of this movement.
    pub kind: MovementKind,

    /// `Date` of this movement.
    pub date: Date,

    /// Display name of the `Contractor` the `Member` is assigned to at (or
    /// after) this movement.
    pub contractor: Option<String>,

    /// Display name of the `Contractor` the `Member` was assigned to before
    /// this movement.
    pub previous_contractor: Option<String>,

    /// Who caused this movement, when known.
    pub responsible: Option<String>,

    /// Calendar month (1..=12) of this movement.
    pub month: i32,

    /// Calendar year of this movement.
    pub year: i32,
}

/// Movement summary of one `Contractor` over one month.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct MonthlySummary {
    /// Display name of the covered `Contractor`, absent for movements of
    /// unassigned `Member`s.
    pub contractor: Option<String>,

    /// Covered calendar year.
    pub year: i32,

    /// Covered calendar month (1..=12).
    pub month: i32,

    /// Count of admissions.
    pub admissions: i32,

    /// Count of terminations.
    pub terminations: i32,

    /// Count of transfers into the contractor.
    pub transfers_in: i32,

    /// Count of transfers out of the contractor.
    pub transfers_out: i32,

    /// Net movement balance.
    pub net_balance: i32,
}

impl From<liquidation::Output> for Report {
    fn from(output: liquidation::Output) -> Self {
        let liquidation::Output {
            report,
            csv,
            contractor_names,
        } = output;

        let name_of = |id: &service::domain::contractor::Id| {
            contractor_names.get(id).map(ToString::to_string)
        };

        Self {
            year: report.filter.year,
            month: report.filter.month.map(i32::from),
            movements: report
                .movements
                .iter()
                .map(|m| Movement {
                    member_id: m.member_id.into(),
                    kind: m.kind.into(),
                    date: m.on,
                    contractor: m.contractor.as_ref().and_then(name_of),
                    previous_contractor: m
                        .previous_contractor
                        .as_ref()
                        .and_then(name_of),
                    responsible: m
                        .responsible
                        .as_ref()
                        .map(ToString::to_string),
                    month: i32::from(m.month),
                    year: m.year,
                })
                .collect(),
            summaries: report
                .summaries
                .iter()
                .map(|s| MonthlySummary {
                    contractor: s.contractor.as_ref().and_then(name_of),
                    year: s.year,
                    month: i32::from(s.month),
                    admissions: s.admissions,
                    terminations: s.terminations,
                    transfers_in: s.transfers_in,
                    transfers_out: s.transfers_out,
                    net_balance: s.net_balance(),
                })
                .collect(),
            total_admissions: report.total_admissions,
            total_terminations: report.total_terminations,
            total_transfers_in: report.total_transfers_in,
            total_transfers_out: report.total_transfers_out,
            net_balance: report.net_balance,
            active_at_start: report.active_at_start,
            active_at_end: report.active_at_end,
            csv,
        }
    }
}
