use crate::history::ShiftHistory;
use crate::model::{CalendarEntry, Person, PersonId, PersonStats, Plan, Roster};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de l'effectif depuis CSV : header `name`, un nom par ligne.
pub fn import_roster_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid roster row (empty name)");
        }
        out.push(Person::new(name));
    }
    Ok(out)
}

/// Import du récapitulatif de la période précédente : header
/// `name,morning,evening,regular`. Une éventuelle colonne week-end est
/// ignorée : seul le journal de gardes alimente la carence.
///
/// Les noms absents du roster sont refusés, pour échouer tôt plutôt que
/// de traîner des compteurs orphelins. Renvoie le nombre de lignes
/// appliquées.
pub fn seed_from_summary_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    history: &mut ShiftHistory,
) -> anyhow::Result<usize> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut applied = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let id = PersonId::new(name);
        if roster.find_person(&id).is_none() {
            bail!("summary row for unknown person: {name}");
        }
        let morning = parse_count(rec.get(1), "morning", name)?;
        let evening = parse_count(rec.get(2), "evening", name)?;
        let regular = parse_count(rec.get(3), "regular", name)?;
        history.seed_totals(&id, morning, evening, regular);
        applied += 1;
    }
    Ok(applied)
}

fn parse_count(field: Option<&str>, column: &str, name: &str) -> anyhow::Result<u32> {
    let raw = field.map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .with_context(|| format!("invalid {column} count for {name}: {raw}"))
}

/// Import du journal de gardes week-end : header `name,week`.
/// N'alimente que la carence. Renvoie le nombre de lignes appliquées.
pub fn seed_from_weekend_log_csv<P: AsRef<Path>>(
    path: P,
    roster: &Roster,
    history: &mut ShiftHistory,
) -> anyhow::Result<usize> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut applied = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let id = PersonId::new(name);
        if roster.find_person(&id).is_none() {
            bail!("weekend log row for unknown person: {name}");
        }
        let week: usize = rec
            .get(1)
            .context("missing week")?
            .trim()
            .parse()
            .with_context(|| format!("invalid week index for {name}"))?;
        history.seed_weekend_week(&id, week);
        applied += 1;
    }
    Ok(applied)
}

/// Export CSV du calendrier : header `date,shift,name`, une ligne par
/// personne et par jour.
pub fn export_calendar_csv<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift", "name"])?;
    for CalendarEntry {
        date,
        shift,
        person,
    } in plan.calendar()
    {
        let date = date.format("%Y-%m-%d").to_string();
        w.write_record([date.as_str(), shift.label(), person.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV des cumuls : header `name,morning,evening,regular,weekend`.
pub fn export_stats_csv<P: AsRef<Path>>(path: P, stats: &[PersonStats]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["name", "morning", "evening", "regular", "weekend"])?;
    for s in stats {
        let counts = [s.morning, s.evening, s.regular, s.weekend].map(|n| n.to_string());
        w.write_record([
            s.person.as_str(),
            counts[0].as_str(),
            counts[1].as_str(),
            counts[2].as_str(),
            counts[3].as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(plan)?;
    fs::write(path, s)?;
    Ok(())
}
