use crate::model::{Plan, ShiftType};
use chrono::NaiveDate;
use thiserror::Error;

/// Nombre maximal d'anciens du week-end précédent admis dans un même
/// groupe matin ou soir.
pub const WEEKEND_ALUMNI_CAP: usize = 2;

/// Bornes de l'horizon et des effectifs par groupe.
pub const MAX_WEEKS: usize = 12;
pub const MAX_GROUP_SIZE: usize = 30;

/// Stratégie de sélection du groupe week-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekendStrategy {
    /// Deux niveaux : d'abord les personnes n'ayant jamais tenu de garde
    /// (tirage aléatoire uniforme), puis les personnes hors carence,
    /// classées par cumul croissant. Comportement canonique.
    #[default]
    TwoTier,
    /// Découpage préalable : l'effectif (hors exclus week-end) est mélangé
    /// une fois puis tranché en groupes consécutifs, un par semaine.
    /// Aucune règle de carence. Variante historique simple.
    Prepartitioned,
}

/// Paramètres d'un run de planification.
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    /// Jour 0 du planning (sert uniquement à l'étiquetage des dates).
    pub start_date: NaiveDate,
    /// Horizon en semaines (1..=12).
    pub weeks: usize,
    pub morning_count: usize,
    pub evening_count: usize,
    pub weekend_count: usize,
    /// Taille minimale d'effectif exigée avant de planifier.
    pub minimum_roster_size: usize,
    pub weekend_strategy: WeekendStrategy,
}

impl PlanOptions {
    /// Valeurs de référence : 4 semaines, 10/10 matin/soir, 5 au week-end,
    /// effectif minimal de 30.
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            weeks: 4,
            morning_count: 10,
            evening_count: 10,
            weekend_count: 5,
            minimum_roster_size: 30,
            weekend_strategy: WeekendStrategy::default(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("morning and evening headcount exceed capacity: {requested} > {available}")]
    CapacityExceeded { requested: usize, available: usize },

    #[error("roster too small: need at least {required} people, got {actual}")]
    RosterTooSmall { required: usize, actual: usize },

    #[error("invalid option: {0}")]
    InvalidOption(&'static str),

    #[error("weekend pool exhausted: {required} slots to fill, {available} people available")]
    WeekendPoolExhausted { required: usize, available: usize },

    /// Échec de faisabilité : la semaine `week` ne peut pas remplir le
    /// groupe `shift`. Les semaines déjà validées sont conservées dans
    /// `partial` pour que l'appelant décide d'en faire quelque chose.
    #[error("week {week}: cannot fill {shift} shift ({assigned}/{required} assigned)")]
    InfeasibleWeek {
        week: usize,
        shift: ShiftType,
        assigned: usize,
        required: usize,
        partial: Box<Plan>,
    },
}
