use super::types::{PlanOptions, WEEKEND_ALUMNI_CAP};
use crate::history::{ShiftHistory, RECENT_WINDOW_WEEKS, WEEKEND_MIN_GAP_WEEKS};
use crate::model::{Person, PersonId, Roster, ShiftType, WeekAssignment};
use rand::seq::index;
use rand::Rng;
use std::collections::HashSet;

/// Groupes de la semaine précédente, consultés par la semaine courante.
/// Vides pour la semaine 0.
#[derive(Debug, Default)]
pub(super) struct PreviousWeek {
    pub morning: HashSet<PersonId>,
    pub evening: HashSet<PersonId>,
    pub weekend: HashSet<PersonId>,
}

impl PreviousWeek {
    pub(super) fn from_assignment(wa: &WeekAssignment) -> Self {
        Self {
            morning: wa.morning.iter().cloned().collect(),
            evening: wa.evening.iter().cloned().collect(),
            weekend: wa.weekend.iter().cloned().collect(),
        }
    }
}

/// Groupe incomplet : la catégorie fautive et le compte atteint.
#[derive(Debug)]
pub(super) struct Shortfall {
    pub shift: ShiftType,
    pub assigned: usize,
    pub required: usize,
}

/// Affecte les quatre groupes d'une semaine et enregistre le résultat
/// dans l'historique. En cas de groupe incomplet, l'historique n'est pas
/// touché et l'appelant reçoit la catégorie fautive.
pub(super) fn assign_week<R: Rng>(
    roster: &Roster,
    history: &mut ShiftHistory,
    week: usize,
    previous: &PreviousWeek,
    options: &PlanOptions,
    weekend_group: Option<&[PersonId]>,
    rng: &mut R,
) -> Result<WeekAssignment, Shortfall> {
    let mut used_this_week: HashSet<PersonId> = HashSet::new();

    // Matin : pas deux semaines de suite, et au plus 2 anciens du
    // week-end précédent.
    let morning = pick_weekday_shift(
        roster,
        history,
        ShiftType::Morning,
        week,
        options.morning_count,
        &used_this_week,
        &previous.morning,
        Some(&previous.weekend),
    )?;
    used_this_week.extend(morning.iter().cloned());

    // Soir : mêmes règles que le matin, sur ses propres ensembles.
    let evening = pick_weekday_shift(
        roster,
        history,
        ShiftType::Evening,
        week,
        options.evening_count,
        &used_this_week,
        &previous.evening,
        Some(&previous.weekend),
    )?;
    used_this_week.extend(evening.iter().cloned());

    // Régulier : le reste de l'effectif, sans règle d'enchaînement.
    let regular_count = roster.len() - options.morning_count - options.evening_count;
    let regular = pick_weekday_shift(
        roster,
        history,
        ShiftType::Regular,
        week,
        regular_count,
        &used_this_week,
        &HashSet::new(),
        None,
    )?;
    used_this_week.extend(regular.iter().cloned());

    // Week-end : tiré sur l'effectif complet, il peut donc recouper les
    // groupes de semaine (matin + soir + régulier couvrent tout l'effectif).
    let weekend = match weekend_group {
        Some(group) => group.to_vec(),
        None => pick_weekend_two_tier(roster, history, week, options.weekend_count, rng)?,
    };

    for person in &morning {
        history.record_assignment(person, ShiftType::Morning, week);
    }
    for person in &evening {
        history.record_assignment(person, ShiftType::Evening, week);
    }
    for person in &regular {
        history.record_assignment(person, ShiftType::Regular, week);
    }
    for person in &weekend {
        history.record_assignment(person, ShiftType::Weekend, week);
    }

    Ok(WeekAssignment {
        week,
        morning,
        evening,
        regular,
        weekend,
    })
}

/// Classement d'équité pour une catégorie : candidats libres cette semaine
/// et non exclus, triés par (cumul de la catégorie, cumul global, charge
/// récente). Le tri est stable : à égalité, l'ordre du roster départage.
fn ranked_candidates<'a>(
    roster: &'a Roster,
    history: &ShiftHistory,
    shift: ShiftType,
    week: usize,
    used_this_week: &HashSet<PersonId>,
) -> Vec<&'a Person> {
    let mut candidates: Vec<&Person> = roster
        .people
        .iter()
        .filter(|p| !used_this_week.contains(&p.id))
        .filter(|p| !p.excluded_from(shift))
        .collect();
    candidates.sort_by_key(|p| {
        (
            history.total_for(&p.id, shift),
            history.total_all_shifts(&p.id),
            history.recent_load(&p.id, shift, week, RECENT_WINDOW_WEEKS),
        )
    });
    candidates
}

/// Parcourt le classement et admet les candidats un à un :
/// - quiconque a tenu la même catégorie la semaine précédente est écarté
///   d'office (`last_same`, pas d'enchaînement) ;
/// - si `alumni_pool` est fourni, les anciens du week-end précédent ne
///   sont admis que tant que le plafond n'est pas atteint.
#[allow(clippy::too_many_arguments)]
fn pick_weekday_shift(
    roster: &Roster,
    history: &ShiftHistory,
    shift: ShiftType,
    week: usize,
    count: usize,
    used_this_week: &HashSet<PersonId>,
    last_same: &HashSet<PersonId>,
    alumni_pool: Option<&HashSet<PersonId>>,
) -> Result<Vec<PersonId>, Shortfall> {
    let ranked = ranked_candidates(roster, history, shift, week, used_this_week);
    let mut picked = Vec::with_capacity(count);
    let mut alumni_admitted = 0usize;

    for person in ranked {
        if picked.len() == count {
            break;
        }
        if last_same.contains(&person.id) {
            continue;
        }
        if let Some(pool) = alumni_pool {
            if pool.contains(&person.id) {
                if alumni_admitted >= WEEKEND_ALUMNI_CAP {
                    continue;
                }
                alumni_admitted += 1;
            }
        }
        picked.push(person.id.clone());
    }

    if picked.len() < count {
        return Err(Shortfall {
            shift,
            assigned: picked.len(),
            required: count,
        });
    }
    Ok(picked)
}

/// Sélection week-end à deux niveaux.
///
/// Niveau A : personnes n'ayant jamais tenu de garde (cumul week-end nul)
/// et non exclues ; tirage aléatoire uniforme si le niveau suffit, la
/// carence ne s'y applique pas. Sinon, tout le niveau A est pris et le
/// complément vient du niveau B : personnes déjà passées par la garde,
/// hors carence, par cumul week-end croissant.
fn pick_weekend_two_tier<R: Rng>(
    roster: &Roster,
    history: &ShiftHistory,
    week: usize,
    count: usize,
    rng: &mut R,
) -> Result<Vec<PersonId>, Shortfall> {
    let tier_a: Vec<&Person> = roster
        .people
        .iter()
        .filter(|p| !p.excluded_from(ShiftType::Weekend))
        .filter(|p| history.total_for(&p.id, ShiftType::Weekend) == 0)
        .collect();

    let mut picked = Vec::with_capacity(count);
    if tier_a.len() >= count {
        for i in index::sample(rng, tier_a.len(), count) {
            picked.push(tier_a[i].id.clone());
        }
        return Ok(picked);
    }

    picked.extend(tier_a.iter().map(|p| p.id.clone()));
    let remaining = count - picked.len();

    let mut tier_b: Vec<&Person> = roster
        .people
        .iter()
        .filter(|p| !p.excluded_from(ShiftType::Weekend))
        .filter(|p| history.total_for(&p.id, ShiftType::Weekend) > 0)
        .filter(|p| history.is_eligible_for_weekend(&p.id, week, WEEKEND_MIN_GAP_WEEKS))
        .collect();
    tier_b.sort_by_key(|p| history.total_for(&p.id, ShiftType::Weekend));
    picked.extend(tier_b.iter().take(remaining).map(|p| p.id.clone()));

    if picked.len() < count {
        return Err(Shortfall {
            shift: ShiftType::Weekend,
            assigned: picked.len(),
            required: count,
        });
    }
    Ok(picked)
}
