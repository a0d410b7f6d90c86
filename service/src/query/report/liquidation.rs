//! Liquidation report definitions.
//!
//! The whole pipeline is a state-free transformation over data already
//! fetched into memory: `&[Member] + Filter → Vec<Movement> →
//! Vec<MonthlySummary> → Report`.

use std::collections::HashMap;

use common::{
    operations::{By, Select},
    Date,
};
use itertools::Itertools as _;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Contractor;
use crate::{
    domain::{contractor, member, Member, Responsible},
    infra::{database, Database},
    read, Query, Service,
};

/// Filter of a [`Liquidation`] report.
#[derive(Clone, Copy, Debug)]
pub struct Filter {
    /// Report year.
    pub year: i32,

    /// Report month (1..=12). [`None`] requests the annual mode covering
    /// all 12 months.
    pub month: Option<u8>,

    /// Restricts the report to one [`Contractor`].
    pub contractor: Option<contractor::Id>,

    /// Restricts the report to one [`MovementKind`]. [`None`] keeps all.
    pub kind: Option<MovementKind>,

    /// Lower bound (inclusive) on movement dates.
    pub from: Option<Date>,

    /// Upper bound (inclusive) on movement dates.
    pub to: Option<Date>,
}

impl Filter {
    /// Returns whether the provided [`Movement`] passes this [`Filter`].
    fn matches(&self, movement: &Movement) -> bool {
        if movement.year != self.year {
            return false;
        }
        if self.month.is_some_and(|m| movement.month != m) {
            return false;
        }
        if let Some(c) = self.contractor {
            if movement.contractor != Some(c)
                && movement.previous_contractor != Some(c)
            {
                return false;
            }
        }
        if self.kind.is_some_and(|k| movement.kind != k) {
            return false;
        }
        if self.from.is_some_and(|from| movement.on < from) {
            return false;
        }
        if self.to.is_some_and(|to| movement.on > to) {
            return false;
        }
        true
    }

    /// Returns the first day of the period requested by this [`Filter`].
    fn period_start(&self) -> Option<Date> {
        Date::first_of_month(self.year, self.month.unwrap_or(1))
    }

    /// Returns the last day of the period requested by this [`Filter`].
    fn period_end(&self) -> Option<Date> {
        Date::last_of_month(self.year, self.month.unwrap_or(12))
    }
}

/// Kind of a [`Movement`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MovementKind {
    /// A [`Member`] was admitted.
    Admission,

    /// A [`Member`] was terminated.
    Termination,

    /// A [`Member`] was reassigned between [`Contractor`]s.
    ContractorChange,
}

/// One movement of one [`Member`], derived per report run and never
/// persisted.
#[derive(Clone, Debug)]
pub struct Movement {
    /// ID of the moved [`Member`].
    pub member_id: member::Id,

    /// [`MovementKind`] of this [`Movement`].
    pub kind: MovementKind,

    /// [`Date`] of this [`Movement`].
    pub on: Date,

    /// ID of the [`Contractor`] the [`Member`] is assigned to at (or after)
    /// this [`Movement`].
    pub contractor: Option<contractor::Id>,

    /// ID of the [`Contractor`] the [`Member`] was assigned to before this
    /// [`Movement`], for [`MovementKind::ContractorChange`].
    pub previous_contractor: Option<contractor::Id>,

    /// [`Responsible`] who caused this [`Movement`], when known.
    pub responsible: Option<Responsible>,

    /// Calendar month (1..=12) extracted from [`on`](Movement::on).
    pub month: u8,

    /// Calendar year extracted from [`on`](Movement::on).
    pub year: i32,
}

/// Derives the [`Movement`]s of the provided [`Member`]s, ascending by date.
///
/// Every [`Member`] yields one [`MovementKind::Admission`] dated at its
/// registration; a terminated one additionally yields one
/// [`MovementKind::Termination`] dated at its termination.
///
/// [`MovementKind::ContractorChange`] movements are not derived here: the
/// kind exists, filters accept it and summaries count transfers, but no
/// live flow populates it from member state alone.
#[must_use]
pub fn movements(members: &[Member]) -> Vec<Movement> {
    let mut out = Vec::with_capacity(members.len());

    for member in members {
        let on: Date = member.registered_on.coerce();
        out.push(Movement {
            member_id: member.id,
            kind: MovementKind::Admission,
            on,
            contractor: member.contractor_id,
            previous_contractor: None,
            responsible: None,
            month: on.month(),
            year: on.year(),
        });

        if let Some(termination) = &member.termination {
            let on: Date = termination.on.coerce();
            out.push(Movement {
                member_id: member.id,
                kind: MovementKind::Termination,
                on,
                contractor: member.contractor_id,
                previous_contractor: None,
                responsible: Some(termination.responsible.clone()),
                month: on.month(),
                year: on.year(),
            });
        }
    }

    out.sort_by_key(|m| m.on);
    out
}

/// Movement summary of one [`Contractor`] over one month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthlySummary {
    /// [`Contractor`] this [`MonthlySummary`] covers. [`None`] groups the
    /// movements of [`Member`]s without an assignment.
    pub contractor: Option<contractor::Id>,

    /// Covered calendar year.
    pub year: i32,

    /// Covered calendar month (1..=12).
    pub month: u8,

    /// Count of admissions.
    pub admissions: i32,

    /// Count of terminations.
    pub terminations: i32,

    /// Count of transfers into the contractor.
    pub transfers_in: i32,

    /// Count of transfers out of the contractor.
    pub transfers_out: i32,
}

impl MonthlySummary {
    /// Creates an all-zero [`MonthlySummary`].
    fn zero(contractor: Option<contractor::Id>, year: i32, month: u8) -> Self {
        Self {
            contractor,
            year,
            month,
            admissions: 0,
            terminations: 0,
            transfers_in: 0,
            transfers_out: 0,
        }
    }

    /// Net movement balance of this [`MonthlySummary`].
    #[must_use]
    pub fn net_balance(&self) -> i32 {
        self.admissions + self.transfers_in
            - self.terminations
            - self.transfers_out
    }

    /// Returns whether all four counts are zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.admissions == 0
            && self.terminations == 0
            && self.transfers_in == 0
            && self.transfers_out == 0
    }
}

/// Summarizes the provided [`Movement`]s per [`Contractor`] over one month.
///
/// All-zero summaries never appear in the output, keeping the
/// representation sparse.
#[must_use]
pub fn monthly_summaries(
    movements: &[Movement],
    year: i32,
    month: u8,
) -> Vec<MonthlySummary> {
    let mut buckets: HashMap<Option<contractor::Id>, MonthlySummary> =
        HashMap::new();

    for movement in movements
        .iter()
        .filter(|m| m.year == year && m.month == month)
    {
        match movement.kind {
            MovementKind::Admission => {
                buckets
                    .entry(movement.contractor)
                    .or_insert_with(|| {
                        MonthlySummary::zero(movement.contractor, year, month)
                    })
                    .admissions += 1;
            }
            MovementKind::Termination => {
                buckets
                    .entry(movement.contractor)
                    .or_insert_with(|| {
                        MonthlySummary::zero(movement.contractor, year, month)
                    })
                    .terminations += 1;
            }
            MovementKind::ContractorChange => {
                buckets
                    .entry(movement.contractor)
                    .or_insert_with(|| {
                        MonthlySummary::zero(movement.contractor, year, month)
                    })
                    .transfers_in += 1;
                buckets
                    .entry(movement.previous_contractor)
                    .or_insert_with(|| {
                        MonthlySummary::zero(
                            movement.previous_contractor,
                            year,
                            month,
                        )
                    })
                    .transfers_out += 1;
            }
        }
    }

    buckets
        .into_values()
        .filter(|s| !s.is_empty())
        .sorted_by_key(|s| s.contractor)
        .collect()
}

/// Liquidation report over one period.
#[derive(Clone, Debug)]
pub struct Report {
    /// [`Filter`] the report was built with.
    pub filter: Filter,

    /// Filtered [`Movement`]s, ascending by date.
    pub movements: Vec<Movement>,

    /// Per-contractor monthly summaries, sparse.
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

    /// Count of [`Member`]s active at the first day of the period, over the
    /// full, unfiltered member set.
    pub active_at_start: i32,

    /// Count of [`Member`]s active at the last day of the period, over the
    /// full, unfiltered member set.
    pub active_at_end: i32,
}

impl Report {
    /// Builds a [`Report`] over the full `members` set with the provided
    /// [`Filter`].
    #[must_use]
    pub fn build(members: &[Member], filter: Filter) -> Self {
        let filtered: Vec<Movement> = movements(members)
            .into_iter()
            .filter(|m| filter.matches(m))
            .collect();

        let summaries: Vec<MonthlySummary> = match filter.month {
            Some(month) => monthly_summaries(&filtered, filter.year, month),
            None => (1..=12)
                .flat_map(|month| {
                    monthly_summaries(&filtered, filter.year, month)
                })
                .collect(),
        };

        let total_admissions = summaries.iter().map(|s| s.admissions).sum();
        let total_terminations =
            summaries.iter().map(|s| s.terminations).sum();
        let total_transfers_in =
            summaries.iter().map(|s| s.transfers_in).sum();
        let total_transfers_out =
            summaries.iter().map(|s| s.transfers_out).sum();
        let net_balance = summaries.iter().map(MonthlySummary::net_balance).sum();

        let active_at_start = filter
            .period_start()
            .map_or(0, |b| count_active_at(members, b));
        let active_at_end = filter
            .period_end()
            .map_or(0, |b| count_active_at(members, b));

        Self {
            filter,
            movements: filtered,
            summaries,
            total_admissions,
            total_terminations,
            total_transfers_in,
            total_transfers_out,
            net_balance,
            active_at_start,
            active_at_end,
        }
    }
}

/// Counts the [`Member`]s active at the provided `boundary` date.
///
/// A [`Member`] counts as active-at-boundary iff it was registered strictly
/// before the boundary and was not terminated at it yet.
fn count_active_at(members: &[Member], boundary: Date) -> i32 {
    let count = members
        .iter()
        .filter(|m| {
            m.registered_on.coerce() < boundary
                && m.termination
                    .as_ref()
                    .map_or(true, |t| t.on.coerce() > boundary)
        })
        .count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// [`Query`] to build a [`Report`] for a given period.
#[derive(Clone, Copy, Debug)]
pub struct Liquidation(pub Filter);

/// Output of the [`Liquidation`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Built [`Report`].
    pub report: Report,

    /// Flat CSV export of the report.
    pub csv: String,

    /// Display names of every known [`Contractor`], for rendering.
    pub contractor_names: HashMap<contractor::Id, contractor::Name>,
}

impl<Db> Query<Liquidation> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Member>, read::member::Filter>>,
            Ok = Vec<Member>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<crate::domain::Contractor>, read::contractor::Filter>>,
            Ok = Vec<crate::domain::Contractor>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Liquidation(filter): Liquidation,
    ) -> Result<Self::Ok, Self::Err> {
        let members: Vec<Member> = self
            .database()
            .execute(Select(By::new(read::member::Filter::default())))
            .await
            .map_err(tracerr::wrap!())?;
        let contractors = self
            .database()
            .execute(Select(By::new(read::contractor::Filter {
                include_inactive: true,
            })))
            .await
            .map_err(tracerr::wrap!())?;

        let contractor_names: HashMap<contractor::Id, contractor::Name> =
            contractors.into_iter().map(|c| (c.id, c.name)).collect();

        let report = Report::build(&members, filter);
        let csv =
            super::csv::export(&report.movements, &members, &contractor_names);

        Ok(Output {
            report,
            csv,
            contractor_names,
        })
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::{contractor, member, Member, Responsible};

    use super::{
        monthly_summaries, movements, Filter, MovementKind, Report,
    };

    fn date(s: &str) -> Date {
        Date::from_iso(s).unwrap()
    }

    fn member(
        registered_on: &str,
        contractor: Option<contractor::Id>,
    ) -> Member {
        Member {
            id: member::Id::new(),
            first_name: "Ana".parse().unwrap(),
            surname: "Gomez".parse().unwrap(),
            national_id: None,
            tax_id: None,
            file_number: None,
            membership_number: None,
            monotributo: false,
            contractor_id: contractor,
            started_on: None,
            registered_on: date(registered_on).coerce(),
            termination: None,
        }
    }

    fn terminate(member: &mut Member, on: &str, responsible: &str) {
        member.termination = Some(member::Termination {
            on: date(on).coerce(),
            responsible: Responsible::new(responsible).unwrap(),
            reason: None,
        });
    }

    fn filter(year: i32, month: Option<u8>) -> Filter {
        Filter {
            year,
            month,
            contractor: None,
            kind: None,
            from: None,
            to: None,
        }
    }

    #[test]
    fn derives_admission_per_member() {
        let members = vec![member("2024-03-05", None)];

        let out = movements(&members);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, MovementKind::Admission);
        assert_eq!(out[0].on, date("2024-03-05"));
        assert_eq!(out[0].month, 3);
        assert_eq!(out[0].year, 2024);
    }

    #[test]
    fn derives_termination_for_terminated_member() {
        let mut m = member("2024-03-05", None);
        terminate(&mut m, "2024-06-10", "J. Perez");
        let members = vec![m];

        let out = movements(&members);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, MovementKind::Admission);
        assert_eq!(out[1].kind, MovementKind::Termination);
        assert_eq!(out[1].on, date("2024-06-10"));
        assert_eq!(
            out[1].responsible.as_ref().map(AsRef::as_ref),
            Some("J. Perez"),
        );
    }

    #[test]
    fn movements_are_sorted_by_date() {
        let members = vec![
            member("2024-05-20", None),
            member("2024-01-02", None),
            member("2024-03-05", None),
        ];

        let out = movements(&members);

        let dates: Vec<_> = out.iter().map(|m| m.on).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn net_balance_matches_partition_counts() {
        let acme = contractor::Id::new();
        let mut terminated = member("2024-03-01", Some(acme));
        terminate(&mut terminated, "2024-03-20", "J. Perez");
        let members = vec![
            member("2024-03-05", Some(acme)),
            member("2024-03-12", Some(acme)),
            terminated,
        ];

        let out = monthly_summaries(&movements(&members), 2024, 3);

        assert_eq!(out.len(), 1);
        let summary = &out[0];
        assert_eq!(summary.admissions, 3);
        assert_eq!(summary.terminations, 1);
        assert_eq!(
            summary.net_balance(),
            summary.admissions + summary.transfers_in
                - summary.terminations
                - summary.transfers_out,
        );
        assert_eq!(summary.net_balance(), 2);
    }

    #[test]
    fn all_zero_summaries_are_dropped() {
        let members = vec![member("2024-03-05", Some(contractor::Id::new()))];

        let out = monthly_summaries(&movements(&members), 2024, 7);

        assert!(out.is_empty());
    }

    #[test]
    fn monthly_report_counts_admission() {
        let acme = contractor::Id::new();
        let members = vec![member("2024-03-05", Some(acme))];

        let report = Report::build(
            &members,
            Filter {
                contractor: Some(acme),
                ..filter(2024, Some(3))
            },
        );

        assert_eq!(report.total_admissions, 1);
        assert_eq!(report.net_balance, 1);
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].contractor, Some(acme));
    }

    #[test]
    fn termination_lands_in_its_month_only() {
        let acme = contractor::Id::new();
        let mut m = member("2024-03-05", Some(acme));
        terminate(&mut m, "2024-06-10", "J. Perez");
        let members = vec![m];

        let june = Report::build(&members, filter(2024, Some(6)));
        assert_eq!(june.total_terminations, 1);
        assert_eq!(june.total_admissions, 0);

        let march = Report::build(&members, filter(2024, Some(3)));
        assert_eq!(march.total_admissions, 1);
        assert_eq!(march.total_terminations, 0);
    }

    #[test]
    fn annual_mode_covers_all_months() {
        let mut m = member("2024-03-05", None);
        terminate(&mut m, "2024-06-10", "J. Perez");
        let members = vec![m, member("2024-11-01", None)];

        let report = Report::build(&members, filter(2024, None));

        assert_eq!(report.total_admissions, 2);
        assert_eq!(report.total_terminations, 1);
        assert_eq!(report.net_balance, 1);
        let months: Vec<_> =
            report.summaries.iter().map(|s| s.month).collect();
        assert_eq!(months, vec![3, 6, 11]);
    }

    #[test]
    fn boundary_actives_scan_the_unfiltered_member_set() {
        let acme = contractor::Id::new();
        let other = contractor::Id::new();
        let mut terminated = member("2024-01-10", Some(other));
        terminate(&mut terminated, "2024-03-15", "J. Perez");
        let members = vec![
            member("2024-03-05", Some(acme)),
            member("2023-12-01", Some(other)),
            terminated,
        ];

        let report = Report::build(
            &members,
            Filter {
                contractor: Some(acme),
                ..filter(2024, Some(3))
            },
        );

        // Registered before 2024-03-01 and not yet terminated at it.
        assert_eq!(report.active_at_start, 2);
        // The termination on 2024-03-15 is not active at 2024-03-31 anymore,
        // while the member registered on 2024-03-05 now is.
        assert_eq!(report.active_at_end, 2);
    }

    #[test]
    fn kind_filter_restricts_movements() {
        let mut m = member("2024-03-05", None);
        terminate(&mut m, "2024-06-10", "J. Perez");
        let members = vec![m];

        let report = Report::build(
            &members,
            Filter {
                kind: Some(MovementKind::Termination),
                ..filter(2024, None)
            },
        );

        assert_eq!(report.movements.len(), 1);
        assert_eq!(report.movements[0].kind, MovementKind::Termination);
    }

    #[test]
    fn date_range_filter_bounds_movements() {
        let members = vec![
            member("2024-01-15", None),
            member("2024-03-05", None),
            member("2024-09-20", None),
        ];

        let report = Report::build(
            &members,
            Filter {
                from: Some(date("2024-02-01")),
                to: Some(date("2024-06-30")),
                ..filter(2024, None)
            },
        );

        assert_eq!(report.movements.len(), 1);
        assert_eq!(report.movements[0].on, date("2024-03-05"));
    }
}
