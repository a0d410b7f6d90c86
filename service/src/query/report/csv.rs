//! Flat CSV export of liquidation reports.
//!
//! The dialect is deliberately primitive and is the exact external
//! contract: a fixed header row, comma separators, no quoting and no
//! escaping. Commas inside free-text fields are replaced with spaces so
//! every row always has exactly six columns.

use std::collections::{HashMap, HashSet};

use crate::domain::{contractor, member, Member};

use super::liquidation::Movement;

/// Header row of the export.
pub const HEADER: &str = "Nombre,Apellido,DNI,Legajo,Contratista,Monotributo";

/// Exports the provided [`Movement`]s as flat CSV.
///
/// One row is emitted per unique [`Member`] appearing anywhere in the
/// movement set, deduplicated by member ID with the first occurrence
/// winning. The `Contratista` column carries the display name of the
/// contractor on that first occurrence.
#[must_use]
pub fn export(
    movements: &[Movement],
    members: &[Member],
    contractor_names: &HashMap<contractor::Id, contractor::Name>,
) -> String {
    let by_id: HashMap<member::Id, &Member> =
        members.iter().map(|m| (m.id, m)).collect();

    let mut seen: HashSet<member::Id> = HashSet::new();
    let mut out = String::from(HEADER);
    out.push('\n');

    for movement in movements {
        if !seen.insert(movement.member_id) {
            continue;
        }
        let Some(member) = by_id.get(&movement.member_id) else {
            continue;
        };

        let contractor = movement
            .contractor
            .and_then(|id| contractor_names.get(&id))
            .map_or("", AsRef::as_ref);

        out.push_str(&row(member, contractor));
        out.push('\n');
    }

    out
}

/// Renders one CSV row of the provided [`Member`].
fn row(member: &Member, contractor: &str) -> String {
    [
        sanitize(member.first_name.as_ref()),
        sanitize(member.surname.as_ref()),
        sanitize(member.national_id.as_ref().map_or("", AsRef::as_ref)),
        sanitize(member.file_number.as_ref().map_or("", AsRef::as_ref)),
        sanitize(contractor),
        String::from(if member.monotributo { "SI" } else { "NO" }),
    ]
    .join(",")
}

/// Replaces commas with spaces, keeping the column count stable.
fn sanitize(value: &str) -> String {
    value.replace(',', " ")
}

#[cfg(test)]
mod spec {
    use std::collections::HashMap;

    use common::Date;

    use crate::domain::{contractor, member, Member, Responsible};
    use crate::query::report::liquidation::movements;

    use super::{export, HEADER};

    fn member(
        first: &str,
        last: &str,
        national_id: Option<&str>,
        contractor: Option<contractor::Id>,
        monotributo: bool,
    ) -> Member {
        Member {
            id: member::Id::new(),
            first_name: first.parse().unwrap(),
            surname: last.parse().unwrap(),
            national_id: national_id.map(|v| v.parse().unwrap()),
            tax_id: None,
            file_number: None,
            membership_number: None,
            monotributo,
            contractor_id: contractor,
            started_on: None,
            registered_on: Date::from_iso("2024-03-05").unwrap().coerce(),
            termination: None,
        }
    }

    #[test]
    fn header_is_exact() {
        let out = export(&[], &[], &HashMap::new());
        assert_eq!(out, format!("{HEADER}\n"));
    }

    #[test]
    fn one_row_per_unique_member() {
        let acme = contractor::Id::new();
        let names: HashMap<_, _> =
            [(acme, contractor::Name::new("Acme").unwrap())].into();

        let mut m = member("Ana", "Gomez", Some("30111222"), Some(acme), true);
        m.termination = Some(member::Termination {
            on: Date::from_iso("2024-06-10").unwrap().coerce(),
            responsible: Responsible::new("J. Perez").unwrap(),
            reason: None,
        });
        let members = vec![m];

        // Two movements (admission + termination), one member.
        let mvs = movements(&members);
        assert_eq!(mvs.len(), 2);

        let out = export(&mvs, &members, &names);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], HEADER);
        assert_eq!(lines[1], "Ana,Gomez,30111222,,Acme,SI");
    }

    #[test]
    fn commas_in_free_text_become_spaces() {
        let acme = contractor::Id::new();
        let names: HashMap<_, _> =
            [(acme, contractor::Name::new("Acme, S.A.").unwrap())].into();
        let members =
            vec![member("Maria, Jose", "Gomez", None, Some(acme), false)];

        let out = export(&movements(&members), &members, &names);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[1], "Maria  Jose,Gomez,,,Acme  S.A.,NO");
        assert!(lines[1].split(',').count() == 6);
    }

    #[test]
    fn unassigned_member_has_empty_contractor_column() {
        let members = vec![member("Ana", "Gomez", None, None, false)];

        let out = export(&movements(&members), &members, &HashMap::new());
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[1], "Ana,Gomez,,,,NO");
    }

    #[test]
    fn row_count_equals_distinct_member_count() {
        let members = vec![
            member("Ana", "Gomez", None, None, false),
            member("Juan", "Diaz", None, None, false),
            member("Eva", "Luna", None, None, false),
        ];

        let out = export(&movements(&members), &members, &HashMap::new());

        assert_eq!(out.lines().count(), 1 + members.len());
    }
}
