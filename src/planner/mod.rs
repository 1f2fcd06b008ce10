mod types;
mod week;

pub use types::{
    PlanError, PlanOptions, WeekendStrategy, MAX_GROUP_SIZE, MAX_WEEKS, WEEKEND_ALUMNI_CAP,
};

use crate::history::ShiftHistory;
use crate::model::{PersonId, PersonStats, Plan, Roster, ShiftType};
use rand::seq::SliceRandom;
use rand::Rng;
use week::PreviousWeek;

/// Résultat d'un run complet : le planning et la projection des cumuls.
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub plan: Plan,
    pub stats: Vec<PersonStats>,
}

/// Planner : enchaîne les semaines sur un roster figé.
///
/// L'historique est fourni par l'appelant (éventuellement pré-alimenté
/// depuis la période précédente) et muté semaine après semaine ; chaque
/// semaine observe les groupes validés de la précédente. Aucun retour en
/// arrière : une semaine émise n'est jamais révisée.
#[derive(Debug)]
pub struct Planner {
    roster: Roster,
    options: PlanOptions,
}

impl Planner {
    pub fn new(roster: Roster, options: PlanOptions) -> Self {
        Self { roster, options }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Vérifie les paramètres avant la semaine 0. Aucune semaine n'est
    /// planifiée si la configuration est incohérente.
    pub fn validate(&self) -> Result<(), PlanError> {
        let o = &self.options;
        if o.weeks == 0 || o.weeks > MAX_WEEKS {
            return Err(PlanError::InvalidOption("weeks must be within 1..=12"));
        }
        for count in [o.morning_count, o.evening_count, o.weekend_count] {
            if count == 0 || count > MAX_GROUP_SIZE {
                return Err(PlanError::InvalidOption(
                    "group headcounts must be within 1..=30",
                ));
            }
        }
        let requested = o.morning_count + o.evening_count;
        if requested > o.minimum_roster_size {
            return Err(PlanError::CapacityExceeded {
                requested,
                available: o.minimum_roster_size,
            });
        }
        if self.roster.len() < o.minimum_roster_size {
            return Err(PlanError::RosterTooSmall {
                required: o.minimum_roster_size,
                actual: self.roster.len(),
            });
        }
        Ok(())
    }

    /// Déroule l'horizon semaine par semaine, dans l'ordre strict.
    ///
    /// En cas de semaine infaisable, le run s'arrête là : l'erreur porte
    /// la semaine, la catégorie en défaut et le planning partiel des
    /// semaines déjà validées. Jamais de groupe sous-rempli silencieux.
    pub fn run<R: Rng>(
        &self,
        history: &mut ShiftHistory,
        rng: &mut R,
    ) -> Result<PlanRun, PlanError> {
        self.validate()?;

        let weekend_groups = match self.options.weekend_strategy {
            WeekendStrategy::TwoTier => None,
            WeekendStrategy::Prepartitioned => Some(self.partition_weekend_pool(rng)?),
        };

        let mut plan = Plan::new(self.options.start_date);
        let mut previous = PreviousWeek::default();

        for current_week in 0..self.options.weeks {
            let group = weekend_groups
                .as_ref()
                .map(|groups| groups[current_week].as_slice());
            match week::assign_week(
                &self.roster,
                history,
                current_week,
                &previous,
                &self.options,
                group,
                rng,
            ) {
                Ok(assignment) => {
                    previous = PreviousWeek::from_assignment(&assignment);
                    plan.weeks.push(assignment);
                }
                Err(shortfall) => {
                    return Err(PlanError::InfeasibleWeek {
                        week: current_week,
                        shift: shortfall.shift,
                        assigned: shortfall.assigned,
                        required: shortfall.required,
                        partial: Box::new(plan),
                    });
                }
            }
        }

        let stats = self.stats(history);
        Ok(PlanRun { plan, stats })
    }

    /// Cumuls par personne, dans l'ordre du roster, lus sur l'historique.
    pub fn stats(&self, history: &ShiftHistory) -> Vec<PersonStats> {
        self.roster
            .people
            .iter()
            .map(|p| history.snapshot(&p.id))
            .collect()
    }

    /// Stratégie `Prepartitioned` : mélange une fois l'effectif éligible
    /// au week-end, puis le tranche en un groupe par semaine.
    fn partition_weekend_pool<R: Rng>(&self, rng: &mut R) -> Result<Vec<Vec<PersonId>>, PlanError> {
        let mut pool: Vec<PersonId> = self
            .roster
            .people
            .iter()
            .filter(|p| !p.excluded_from(ShiftType::Weekend))
            .map(|p| p.id.clone())
            .collect();
        let required = self.options.weeks * self.options.weekend_count;
        if pool.len() < required {
            return Err(PlanError::WeekendPoolExhausted {
                required,
                available: pool.len(),
            });
        }
        pool.shuffle(rng);
        Ok(pool
            .chunks(self.options.weekend_count)
            .take(self.options.weeks)
            .map(<[PersonId]>::to_vec)
            .collect())
    }
}
