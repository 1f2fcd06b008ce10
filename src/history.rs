use crate::model::{PersonId, PersonStats, ShiftType};
use std::collections::{BTreeSet, HashMap};

/// Fenêtre glissante (en semaines) pour la charge récente.
pub const RECENT_WINDOW_WEEKS: usize = 3;

/// Écart minimal (en semaines) entre deux gardes de week-end.
pub const WEEKEND_MIN_GAP_WEEKS: usize = 2;

/// Historique mutable d'un run : compteurs par personne et par catégorie,
/// semaines travaillées (pour la récence), semaines de garde week-end
/// (pour le délai de carence).
///
/// C'est le seul état partagé entre semaines ; il appartient au `Planner`
/// et n'est muté qu'une fois par personne affectée et par semaine.
#[derive(Debug, Clone, Default)]
pub struct ShiftHistory {
    totals: HashMap<(PersonId, ShiftType), u32>,
    weeks_worked: HashMap<(PersonId, ShiftType), BTreeSet<usize>>,
    weekend_weeks: HashMap<PersonId, BTreeSet<usize>>,
}

impl ShiftHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Importe les cumuls d'une période précédente (matin/soir/régulier).
    ///
    /// Seuls les compteurs sont alimentés : les semaines exactes de la
    /// période passée sont inconnues, donc ni la récence ni la carence
    /// week-end ne sont touchées. Le cumul week-end n'est volontairement
    /// pas importable par ce biais (seul le journal de gardes fait foi).
    pub fn seed_totals(&mut self, person: &PersonId, morning: u32, evening: u32, regular: u32) {
        for (shift, n) in [
            (ShiftType::Morning, morning),
            (ShiftType::Evening, evening),
            (ShiftType::Regular, regular),
        ] {
            if n > 0 {
                *self.totals.entry((person.clone(), shift)).or_insert(0) += n;
            }
        }
    }

    /// Importe une entrée du journal de gardes week-end de la période
    /// précédente. N'affecte que la carence, pas les compteurs.
    pub fn seed_weekend_week(&mut self, person: &PersonId, week: usize) {
        self.weekend_weeks.entry(person.clone()).or_default().insert(week);
    }

    /// Enregistre une affectation : incrémente le compteur (une fois par
    /// semaine et par catégorie, pas par jour calendaire) et mémorise la
    /// semaine pour la récence. Une garde week-end alimente aussi la carence.
    pub fn record_assignment(&mut self, person: &PersonId, shift: ShiftType, week: usize) {
        *self.totals.entry((person.clone(), shift)).or_insert(0) += 1;
        self.weeks_worked
            .entry((person.clone(), shift))
            .or_default()
            .insert(week);
        if shift == ShiftType::Weekend {
            self.weekend_weeks.entry(person.clone()).or_default().insert(week);
        }
    }

    pub fn total_for(&self, person: &PersonId, shift: ShiftType) -> u32 {
        self.totals
            .get(&(person.clone(), shift))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_all_shifts(&self, person: &PersonId) -> u32 {
        ShiftType::ALL
            .iter()
            .map(|&shift| self.total_for(person, shift))
            .sum()
    }

    /// Nombre de semaines récentes (à `window` semaines ou moins de
    /// `current_week`) où `person` a tenu la catégorie `shift`.
    pub fn recent_load(
        &self,
        person: &PersonId,
        shift: ShiftType,
        current_week: usize,
        window: usize,
    ) -> usize {
        self.weeks_worked
            .get(&(person.clone(), shift))
            .map(|weeks| {
                weeks
                    .iter()
                    .filter(|&&w| current_week as i64 - w as i64 <= window as i64)
                    .count()
            })
            .unwrap_or(0)
    }

    /// Vrai si toutes les gardes week-end connues de `person` sont à au
    /// moins `min_gap` semaines (en valeur absolue) de `current_week`.
    pub fn is_eligible_for_weekend(
        &self,
        person: &PersonId,
        current_week: usize,
        min_gap: usize,
    ) -> bool {
        self.weekend_weeks
            .get(person)
            .map(|weeks| {
                weeks
                    .iter()
                    .all(|&w| (current_week as i64 - w as i64).unsigned_abs() as usize >= min_gap)
            })
            .unwrap_or(true)
    }

    /// Projection des cumuls d'une personne, pour le tableau de statistiques.
    pub fn snapshot(&self, person: &PersonId) -> PersonStats {
        PersonStats {
            person: person.clone(),
            morning: self.total_for(person, ShiftType::Morning),
            evening: self.total_for(person, ShiftType::Evening),
            regular: self.total_for(person, ShiftType::Regular),
            weekend: self.total_for(person, ShiftType::Weekend),
        }
    }
}
