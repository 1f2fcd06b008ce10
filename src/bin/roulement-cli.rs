#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use roulement::{
    io,
    model::{PersonId, Plan, Roster, ShiftType},
    planner::{PlanError, PlanOptions, Planner, WeekendStrategy},
    storage::{JsonStorage, Storage},
    ShiftHistory,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification de roulements (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    /// Deux niveaux : jamais-servis puis hors-carence (canonique)
    TwoTier,
    /// Groupes pré-tranchés après un seul mélange
    Prepartitioned,
}

impl From<StrategyArg> for WeekendStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::TwoTier => WeekendStrategy::TwoTier,
            StrategyArg::Prepartitioned => WeekendStrategy::Prepartitioned,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer un planning sur plusieurs semaines
    Generate {
        /// CSV de l'effectif (header `name`)
        #[arg(long)]
        roster: String,

        /// Jour 0 du planning (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,

        #[arg(long, default_value_t = 4)]
        weeks: usize,
        #[arg(long, default_value_t = 10)]
        morning: usize,
        #[arg(long, default_value_t = 10)]
        evening: usize,
        #[arg(long, default_value_t = 5)]
        weekend: usize,
        /// Taille minimale d'effectif exigée
        #[arg(long, default_value_t = 30)]
        min_roster: usize,

        /// liste "nom1,nom2,..." à ne jamais mettre du matin
        #[arg(long)]
        exclude_morning: Option<String>,
        /// liste "nom1,nom2,..." à ne jamais mettre du soir
        #[arg(long)]
        exclude_evening: Option<String>,
        /// liste "nom1,nom2,..." à ne jamais mettre de garde week-end
        #[arg(long)]
        exclude_weekend: Option<String>,

        /// CSV récapitulatif de la période précédente (`name,morning,evening,regular`)
        #[arg(long)]
        summary: Option<String>,
        /// CSV du journal de gardes week-end précédent (`name,week`)
        #[arg(long)]
        weekend_log: Option<String>,

        /// Graine du générateur aléatoire (reproductibilité)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value = "two-tier")]
        strategy: StrategyArg,

        /// Export CSV du calendrier
        #[arg(long)]
        out_calendar: Option<String>,
        /// Export CSV des cumuls par personne
        #[arg(long)]
        out_stats: Option<String>,
        /// Fichier JSON où persister le planning
        #[arg(long)]
        plan: Option<String>,
    },

    /// Afficher un planning persisté, et optionnellement le réexporter
    Show {
        /// Fichier JSON de planning
        #[arg(long, default_value = "plan.json")]
        plan: String,
        #[arg(long)]
        out_calendar: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            roster,
            start_date,
            weeks,
            morning,
            evening,
            weekend,
            min_roster,
            exclude_morning,
            exclude_evening,
            exclude_weekend,
            summary,
            weekend_log,
            seed,
            strategy,
            out_calendar,
            out_stats,
            plan,
        } => {
            let people = io::import_roster_csv(&roster)?;
            let mut roster = Roster::new(people).map_err(anyhow::Error::msg)?;
            apply_exclusions(&mut roster, ShiftType::Morning, exclude_morning.as_deref())?;
            apply_exclusions(&mut roster, ShiftType::Evening, exclude_evening.as_deref())?;
            apply_exclusions(&mut roster, ShiftType::Weekend, exclude_weekend.as_deref())?;

            let mut history = ShiftHistory::new();
            if let Some(path) = summary {
                let rows = io::seed_from_summary_csv(path, &roster, &mut history)?;
                println!("Seeded totals for {rows} people from previous summary");
            }
            if let Some(path) = weekend_log {
                let rows = io::seed_from_weekend_log_csv(path, &roster, &mut history)?;
                println!("Seeded {rows} weekend-duty entries from previous log");
            }

            let start_date: NaiveDate = start_date.parse()?;
            let options = PlanOptions {
                start_date,
                weeks,
                morning_count: morning,
                evening_count: evening,
                weekend_count: weekend,
                minimum_roster_size: min_roster,
                weekend_strategy: strategy.into(),
            };

            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_os_rng(),
            };

            let planner = Planner::new(roster, options);
            match planner.run(&mut history, &mut rng) {
                Ok(run) => {
                    print_plan(&run.plan);
                    if let Some(path) = out_calendar {
                        io::export_calendar_csv(path, &run.plan)?;
                    }
                    if let Some(path) = out_stats {
                        io::export_stats_csv(path, &run.stats)?;
                    }
                    if let Some(path) = plan {
                        JsonStorage::open(path)?.save(&run.plan)?;
                    }
                    0
                }
                Err(PlanError::InfeasibleWeek {
                    week,
                    shift,
                    assigned,
                    required,
                    partial,
                }) => {
                    eprintln!(
                        "infeasible at week {week}: {shift} shift filled {assigned}/{required}"
                    );
                    eprintln!(
                        "keeping the {} fully planned week(s)",
                        partial.weeks_planned()
                    );
                    print_plan(&partial);
                    if let Some(path) = out_calendar {
                        io::export_calendar_csv(path, &partial)?;
                    }
                    if let Some(path) = out_stats {
                        io::export_stats_csv(path, &planner.stats(&history))?;
                    }
                    if let Some(path) = plan {
                        JsonStorage::open(path)?.save(&partial)?;
                    }
                    // Code 2 = WARNING/INCOMPLETE
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Show { plan, out_calendar } => {
            let storage = JsonStorage::open(&plan)?;
            let plan = storage.load()?;
            print_plan(&plan);
            if let Some(path) = out_calendar {
                io::export_calendar_csv(path, &plan)?;
            }
            0
        }
    };

    std::process::exit(code);
}

fn apply_exclusions(
    roster: &mut Roster,
    shift: ShiftType,
    list: Option<&str>,
) -> Result<()> {
    let Some(list) = list else { return Ok(()) };
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        roster
            .add_exclusion(&PersonId::new(name), shift)
            .map_err(anyhow::Error::msg)?;
    }
    Ok(())
}

// impression compacte, une ligne par groupe et par semaine
fn print_plan(plan: &Plan) {
    for wa in &plan.weeks {
        let start = plan.week_start(wa.week);
        for shift in ShiftType::ALL {
            let names: Vec<&str> = wa.group(shift).iter().map(PersonId::as_str).collect();
            println!(
                "week {} | {} | {}: {}",
                wa.week,
                start.format("%Y-%m-%d"),
                shift,
                names.join(",")
            );
        }
    }
}
