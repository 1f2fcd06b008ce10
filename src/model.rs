use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catégorie de créneau. Les trois premières sont hebdomadaires (lundi-vendredi),
/// `Weekend` couvre la paire samedi-dimanche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Evening,
    Regular,
    Weekend,
}

impl ShiftType {
    pub const ALL: [ShiftType; 4] = [
        ShiftType::Morning,
        ShiftType::Evening,
        ShiftType::Regular,
        ShiftType::Weekend,
    ];

    /// Les trois catégories du lundi au vendredi.
    pub const WEEKDAY: [ShiftType; 3] =
        [ShiftType::Morning, ShiftType::Evening, ShiftType::Regular];

    pub fn label(self) -> &'static str {
        match self {
            ShiftType::Morning => "morning",
            ShiftType::Evening => "evening",
            ShiftType::Regular => "regular",
            ShiftType::Weekend => "weekend",
        }
    }

    pub fn is_weekday(self) -> bool {
        !matches!(self, ShiftType::Weekend)
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Personne (membre de l'équipe) avec ses catégories interdites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded: BTreeSet<ShiftType>,
}

impl Person {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Self {
            id: PersonId::new(name),
            excluded: BTreeSet::new(),
        }
    }

    /// Interdit une catégorie à cette personne (chaînable).
    pub fn exclude(mut self, shift: ShiftType) -> Self {
        self.excluded.insert(shift);
        self
    }

    pub fn excluded_from(&self, shift: ShiftType) -> bool {
        self.excluded.contains(&shift)
    }
}

/// Effectif complet, dans l'ordre d'entrée (l'ordre sert de départage stable).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub people: Vec<Person>,
}

impl Roster {
    /// Construit un roster en validant l'unicité des identifiants.
    pub fn new(people: Vec<Person>) -> Result<Self, String> {
        let mut seen = BTreeSet::new();
        for p in &people {
            if !seen.insert(p.id.clone()) {
                return Err(format!("duplicate person in roster: {}", p.id));
            }
        }
        Ok(Self { people })
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn find_person<'a>(&'a self, id: &PersonId) -> Option<&'a Person> {
        self.people.iter().find(|p| &p.id == id)
    }

    pub fn find_person_mut(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| &p.id == id)
    }

    /// Marque une catégorie interdite pour `id`. Erreur si la personne est inconnue.
    pub fn add_exclusion(&mut self, id: &PersonId, shift: ShiftType) -> Result<(), String> {
        match self.find_person_mut(id) {
            Some(p) => {
                p.excluded.insert(shift);
                Ok(())
            }
            None => Err(format!("unknown person: {id}")),
        }
    }
}

/// Affectation d'une semaine : les quatre groupes, dans l'ordre de sélection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekAssignment {
    pub week: usize,
    pub morning: Vec<PersonId>,
    pub evening: Vec<PersonId>,
    pub regular: Vec<PersonId>,
    pub weekend: Vec<PersonId>,
}

impl WeekAssignment {
    pub fn group(&self, shift: ShiftType) -> &[PersonId] {
        match shift {
            ShiftType::Morning => &self.morning,
            ShiftType::Evening => &self.evening,
            ShiftType::Regular => &self.regular,
            ShiftType::Weekend => &self.weekend,
        }
    }
}

/// Ligne de calendrier : une personne, un jour, une catégorie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub person: PersonId,
}

/// Cumul par personne, lu sur l'historique en fin de run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonStats {
    pub person: PersonId,
    pub morning: u32,
    pub evening: u32,
    pub regular: u32,
    pub weekend: u32,
}

/// Planning produit : semaines affectées, immuables une fois émises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub start_date: NaiveDate,
    pub weeks: Vec<WeekAssignment>,
}

impl Plan {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            weeks: Vec::new(),
        }
    }

    pub fn weeks_planned(&self) -> usize {
        self.weeks.len()
    }

    /// Premier jour de la semaine `week` (la date de départ est le jour 0).
    pub fn week_start(&self, week: usize) -> NaiveDate {
        self.start_date + Duration::weeks(week as i64)
    }

    /// Développe le planning en lignes par jour calendaire :
    /// 5 jours ouvrés (matin/soir/régulier), puis la paire week-end.
    pub fn calendar(&self) -> Vec<CalendarEntry> {
        let mut rows = Vec::new();
        for wa in &self.weeks {
            let first_day = self.week_start(wa.week);
            for offset in 0..5 {
                let date = first_day + Duration::days(offset);
                for shift in ShiftType::WEEKDAY {
                    for person in wa.group(shift) {
                        rows.push(CalendarEntry {
                            date,
                            shift,
                            person: person.clone(),
                        });
                    }
                }
            }
            for offset in 5..7 {
                let date = first_day + Duration::days(offset);
                for person in &wa.weekend {
                    rows.push(CalendarEntry {
                        date,
                        shift: ShiftType::Weekend,
                        person: person.clone(),
                    });
                }
            }
        }
        rows
    }
}
