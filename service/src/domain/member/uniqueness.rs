//! Uniqueness validation of [`Member`] identity fields.
//!
//! Validation is a pure function over the candidate payload and the full
//! existing [`Member`] set, run before any write. All simultaneous
//! violations are reported at once, keyed by the offending field.

use std::{collections::BTreeMap, fmt};

use super::{
    FileNumber, Id, Member, MembershipNumber, NationalId, TaxId,
};

/// Identity field of a [`Member`] subject to uniqueness checking.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Field {
    /// National identity document number (DNI).
    NationalId,

    /// Fiscal identifier (CUIT).
    TaxId,

    /// Internal file number ("legajo").
    FileNumber,

    /// Membership number.
    MembershipNumber,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NationalId => "national_id",
            Self::TaxId => "tax_id",
            Self::FileNumber => "file_number",
            Self::MembershipNumber => "membership_number",
        })
    }
}

/// Uniqueness violations, keyed by the offending [`Field`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Conflicts(BTreeMap<Field, String>);

impl Conflicts {
    /// Returns whether no violation was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the violation message of the provided [`Field`], if any.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Iterates over the detected violations.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Records a violation of the provided [`Field`], keeping the first one
    /// when several [`Member`]s conflict on the same field.
    fn record(&mut self, field: Field, message: String) {
        _ = self.0.entry(field).or_insert(message);
    }
}

impl fmt::Display for Conflicts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msg) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

/// Candidate payload being validated.
#[derive(Clone, Debug, Default)]
pub struct Candidate {
    /// ID of the [`Member`] being edited, excluded from the comparison.
    ///
    /// [`None`] when validating a new registration.
    pub id: Option<Id>,

    /// Candidate [`NationalId`].
    pub national_id: Option<NationalId>,

    /// Candidate [`TaxId`].
    pub tax_id: Option<TaxId>,

    /// Candidate [`FileNumber`].
    pub file_number: Option<FileNumber>,

    /// Candidate [`MembershipNumber`].
    pub membership_number: Option<MembershipNumber>,
}

/// Validates the provided [`Candidate`] against the full `existing`
/// [`Member`] set.
///
/// Comparison is trimmed and case-insensitive. Unset fields never conflict,
/// and the [`Member`] identified by [`Candidate::id`] is skipped, so a
/// record never conflicts with itself while being edited.
#[must_use]
pub fn conflicts(candidate: &Candidate, existing: &[Member]) -> Conflicts {
    let mut found = Conflicts::default();

    for member in existing {
        if candidate.id == Some(member.id) {
            continue;
        }

        check(
            &mut found,
            Field::NationalId,
            candidate.national_id.as_ref().map(AsRef::as_ref),
            member.national_id.as_ref().map(AsRef::as_ref),
            member,
        );
        check(
            &mut found,
            Field::TaxId,
            candidate.tax_id.as_ref().map(AsRef::as_ref),
            member.tax_id.as_ref().map(AsRef::as_ref),
            member,
        );
        check(
            &mut found,
            Field::FileNumber,
            candidate.file_number.as_ref().map(AsRef::as_ref),
            member.file_number.as_ref().map(AsRef::as_ref),
            member,
        );
        check(
            &mut found,
            Field::MembershipNumber,
            candidate.membership_number.as_ref().map(AsRef::as_ref),
            member.membership_number.as_ref().map(AsRef::as_ref),
            member,
        );
    }

    found
}

/// Compares one [`Field`] of the candidate against one [`Member`], recording
/// a violation into `found` on a match.
fn check(
    found: &mut Conflicts,
    field: Field,
    candidate: Option<&str>,
    existing: Option<&str>,
    member: &Member,
) {
    let (Some(candidate), Some(existing)) = (candidate, existing) else {
        return;
    };
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return;
    }

    if candidate.eq_ignore_ascii_case(existing.trim()) {
        let mut message =
            format!("already registered to {}", member.full_name());
        if !member.is_active() {
            message.push_str(" (terminated)");
        }
        found.record(field, message);
    }
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::domain::{member, Responsible};

    use super::{conflicts, Candidate, Field, Member};

    fn member(
        first: &str,
        last: &str,
        national_id: Option<&str>,
        file_number: Option<&str>,
    ) -> Member {
        Member {
            id: member::Id::new(),
            first_name: first.parse().unwrap(),
            surname: last.parse().unwrap(),
            national_id: national_id.map(|v| v.parse().unwrap()),
            tax_id: None,
            file_number: file_number.map(|v| v.parse().unwrap()),
            membership_number: None,
            monotributo: false,
            contractor_id: None,
            started_on: None,
            registered_on: Date::from_iso("2024-01-10").unwrap().coerce(),
            termination: None,
        }
    }

    #[test]
    fn reports_national_id_conflict_naming_the_other_member() {
        let existing = vec![member("Ana", "Gomez", Some("30111222"), None)];

        let found = conflicts(
            &Candidate {
                national_id: Some("30111222".parse().unwrap()),
                ..Candidate::default()
            },
            &existing,
        );

        assert_eq!(
            found.get(Field::NationalId),
            Some("already registered to Ana Gomez"),
        );
    }

    #[test]
    fn notes_terminated_conflicting_member() {
        let mut other = member("Ana", "Gomez", Some("30111222"), None);
        other.termination = Some(member::Termination {
            on: Date::from_iso("2024-06-10").unwrap().coerce(),
            responsible: Responsible::new("J. Perez").unwrap(),
            reason: None,
        });
        let existing = vec![other];

        let found = conflicts(
            &Candidate {
                national_id: Some("30111222".parse().unwrap()),
                ..Candidate::default()
            },
            &existing,
        );

        assert_eq!(
            found.get(Field::NationalId),
            Some("already registered to Ana Gomez (terminated)"),
        );
    }

    #[test]
    fn unset_fields_never_conflict() {
        let existing = vec![
            member("Ana", "Gomez", None, None),
            member("Juan", "Diaz", None, None),
        ];

        let found = conflicts(&Candidate::default(), &existing);

        assert!(found.is_empty());
    }

    #[test]
    fn reports_all_simultaneous_violations() {
        let existing = vec![
            member("Ana", "Gomez", Some("30111222"), None),
            member("Juan", "Diaz", None, Some("L-42")),
        ];

        let found = conflicts(
            &Candidate {
                national_id: Some("30111222".parse().unwrap()),
                file_number: Some("l-42".parse().unwrap()),
                ..Candidate::default()
            },
            &existing,
        );

        assert_eq!(
            found.get(Field::NationalId),
            Some("already registered to Ana Gomez"),
        );
        assert_eq!(
            found.get(Field::FileNumber),
            Some("already registered to Juan Diaz"),
        );
    }

    #[test]
    fn edited_record_is_excluded() {
        let existing = vec![member("Ana", "Gomez", Some("30111222"), None)];

        let found = conflicts(
            &Candidate {
                id: Some(existing[0].id),
                national_id: Some("30111222".parse().unwrap()),
                ..Candidate::default()
            },
            &existing,
        );

        assert!(found.is_empty());
    }

    #[test]
    fn comparison_is_case_insensitive() {
        let existing = vec![member("Ana", "Gomez", None, Some("ab-7"))];

        let found = conflicts(
            &Candidate {
                file_number: Some("AB-7".parse().unwrap()),
                ..Candidate::default()
            },
            &existing,
        );

        assert!(found.get(Field::FileNumber).is_some());
    }
}
