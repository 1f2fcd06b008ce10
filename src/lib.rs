#![forbid(unsafe_code)]
//! Roulement — bibliothèque de planification de roulements hebdomadaires (sans BD).
//!
//! - Entrées/sorties fichiers (CSV/JSON).
//! - Affectation gloutonne multi-critères : équité des cumuls, pas
//!   d'enchaînement d'une même catégorie, carence entre gardes week-end.
//! - Déterministe à générateur aléatoire injecté près (tirage du groupe
//!   week-end) ; les dates ne servent qu'à l'étiquetage des jours.

pub mod history;
pub mod io;
pub mod model;
pub mod planner;
pub mod storage;

pub use history::{ShiftHistory, RECENT_WINDOW_WEEKS, WEEKEND_MIN_GAP_WEEKS};
pub use model::{
    CalendarEntry, Person, PersonId, PersonStats, Plan, Roster, ShiftType, WeekAssignment,
};
pub use planner::{
    PlanError, PlanOptions, PlanRun, Planner, WeekendStrategy, WEEKEND_ALUMNI_CAP,
};
pub use storage::{JsonStorage, Storage};
