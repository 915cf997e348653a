//! Command-line front end for the catalog: list, filter, edit, import and export.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ludotheque::{
    catalog::{
        CatalogSession, FilterCriteria, Gate, HttpCatalogRepository, RecordEditor, SearchScope,
        render::EMPTY_MESSAGE,
    },
    config::AppConfig,
};

#[derive(Debug, Parser)]
#[command(name = "catalog-cli", about = "Manage the board-game catalog")]
struct Cli {
    /// Address of the `/games` resource.
    #[arg(
        long,
        env = "LUDOTHEQUE_API_URL",
        default_value = "http://localhost:8080/games"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List games matching the given filters.
    List(FilterArgs),
    /// Show every field of one game.
    Show { id: String },
    /// Create a new game.
    Add(RecordArgs),
    /// Change fields of an existing game; omitted fields stay as they are.
    Edit {
        id: String,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Delete a game.
    Delete {
        id: String,
        /// Skip the confirmation question.
        #[arg(long)]
        yes: bool,
    },
    /// Write the whole collection as pretty-printed JSON.
    Export {
        #[arg(long, short, default_value = "ludotheque.json")]
        output: PathBuf,
    },
    /// Replace the whole collection with the contents of a JSON file.
    Import { file: PathBuf },
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Case-insensitive text to look for.
    #[arg(long, short)]
    query: Option<String>,
    /// Search descriptions, remarks and tags too, not just names.
    #[arg(long)]
    everywhere: bool,
    /// Keep games carrying any of these tags.
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long)]
    min_age: Option<u32>,
    #[arg(long)]
    max_duration: Option<u32>,
    #[arg(long)]
    min_players: Option<u32>,
    #[arg(long)]
    max_players: Option<u32>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        Self {
            query: args.query.unwrap_or_default(),
            scope: if args.everywhere {
                SearchScope::Everything
            } else {
                SearchScope::Name
            },
            tags: args.tags,
            min_age: args.min_age,
            max_duration: args.max_duration,
            min_players: args.min_players,
            max_players: args.max_players,
        }
    }
}

#[derive(Debug, Args)]
struct RecordArgs {
    #[arg(long)]
    nom: Option<String>,
    #[arg(long)]
    min: Option<String>,
    #[arg(long)]
    max: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    duree: Option<String>,
    /// Replaces all tags when given at least once.
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long)]
    remarque: Option<String>,
    #[arg(long)]
    lien: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Image file to embed.
    #[arg(long, conflicts_with = "clear_photo")]
    photo: Option<PathBuf>,
    /// Remove the current photo.
    #[arg(long)]
    clear_photo: bool,
}

impl RecordArgs {
    fn apply(self, editor: &mut RecordEditor) -> anyhow::Result<()> {
        let form = editor.form_mut()?;
        let fields = [
            (self.nom, &mut form.nom),
            (self.min, &mut form.nb_joueur_min),
            (self.max, &mut form.nb_joueur_max),
            (self.age, &mut form.age),
            (self.duree, &mut form.duree),
            (self.remarque, &mut form.remarque),
            (self.lien, &mut form.lien),
            (self.description, &mut form.description),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if !self.tags.is_empty() {
            editor.tags_mut()?.set_values(&self.tags);
        }
        if self.clear_photo {
            editor.clear_photo()?;
        }
        if let Some(photo) = self.photo {
            editor.select_photo(photo)?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let gate = Gate::from_config(&AppConfig::load());
    let mut session = CatalogSession::new(HttpCatalogRepository::new(cli.api_url));
    session.load().await.context("loading the collection")?;

    match cli.command {
        Command::List(filters) => {
            if session.games().is_empty() {
                println!("{EMPTY_MESSAGE}");
                return Ok(());
            }
            for row in session.rows(&filters.into()) {
                let tags = row.tags.join(", ");
                println!("{}  {}  [{}]  {}", row.id, row.name, tags, row.summary);
            }
        }
        Command::Show { id } => {
            let game = session
                .find(&id)
                .with_context(|| format!("no game with id `{id}`"))?;
            println!("{}", serde_json::to_string_pretty(game)?);
        }
        Command::Add(record) => {
            let secret = prompt("Passphrase: ")?;
            let mut editor = RecordEditor::create(&gate, &secret, session.known_tags())?;
            record.apply(&mut editor)?;
            let game = session.submit(&mut editor).await?;
            println!("added {} ({})", game.nom, game.id);
        }
        Command::Edit { id, record } => {
            let mut editor = session
                .open(&id)
                .with_context(|| format!("no game with id `{id}`"))?;
            let secret = prompt("Passphrase: ")?;
            editor.unlock(&gate, &secret)?;
            record.apply(&mut editor)?;
            let game = session.submit(&mut editor).await?;
            println!("saved {} ({})", game.nom, game.id);
        }
        Command::Delete { id, yes } => {
            let secret = prompt("Passphrase: ")?;
            let confirm = |game: &ludotheque::catalog::Game| {
                yes || prompt(&format!("Delete \"{}\"? [y/N] ", game.nom))
                    .map(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
                    .unwrap_or(false)
            };
            match session.delete(&gate, &secret, &id, confirm).await? {
                Some(game) => println!("deleted {} ({})", game.nom, game.id),
                None => println!("nothing deleted"),
            }
        }
        Command::Export { output } => {
            fs::write(&output, session.export()?)
                .with_context(|| format!("writing {}", output.display()))?;
            println!(
                "exported {} games to {}",
                session.games().len(),
                output.display()
            );
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let count = session.import(&text).await?;
            println!("import finished: {count} games");
        }
    }

    Ok(())
}

/// Ask a question on stdout and read one line from stdin.
fn prompt(question: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(question.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_owned())
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
