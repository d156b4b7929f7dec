use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use classroom::app::Classroom;
use classroom::config::{ClientConfig, ConfigError};
use classroom::net::ApiError;
use classroom::net::types::{Id, NewCourse, NewModule, NewUnit, UnitType};
use classroom::state::StoreError;
use classroom::view::render;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Parser, Debug)]
#[command(name = "classroom", about = "Course and classwork client for the LMS backend")]
struct Cli {
    /// Overrides CLASSROOM_API_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Session cookie value printed by `login`.
    #[arg(long, env = "CLASSROOM_SESSION_TOKEN")]
    session_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show who the backend thinks you are.
    Whoami,
    /// Exchange a Google ID token for a session.
    Login {
        #[arg(long)]
        token: String,
    },
    Logout,
    /// List your courses.
    Courses,
    /// Show one course with its modules and units.
    Course { course_id: String },
    CreateCourse {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    CreateModule {
        course_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Defaults to after the last module.
        #[arg(long)]
        order: Option<i64>,
    },
    CreateUnit {
        course_id: String,
        module_id: String,
        #[arg(long)]
        title: String,
        /// material, assignment, video, quiz, discussion or external_link.
        #[arg(long)]
        unit_type: UnitType,
        #[arg(long)]
        content: Option<String>,
        /// Defaults to after the last unit.
        #[arg(long)]
        order: Option<i64>,
    },
    Modules { course_id: String },
    Units { module_id: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url)?;
    }

    let app = Classroom::from_config(config, cli.session_token.as_deref())?;
    app.init().await;
    let result = run(&app, cli.command).await;
    app.teardown();
    result
}

async fn run(app: &Classroom, command: Command) -> Result<(), CliError> {
    match command {
        Command::Whoami => {
            println!("{}", render::navbar(&app.session.snapshot()));
            if let Some(user) = app.session.snapshot().user() {
                println!("{} <{}>", user.display_name(), user.email);
            }
            Ok(())
        }
        Command::Login { token } => {
            let result = app.session.login(&token).await;
            println!("{}", render::navbar(&app.session.snapshot()));
            result?;
            if let Some(session) = app.session_token() {
                println!("session token: {session}");
                println!("reuse it with: export CLASSROOM_SESSION_TOKEN={session}");
            }
            Ok(())
        }
        Command::Logout => {
            let result = app.session.logout().await;
            println!("{}", render::navbar(&app.session.snapshot()));
            result.map_err(CliError::from)
        }
        Command::Courses => {
            let result = app.courses.list_for_user().await;
            println!("{}", render::course_list(&app.session.status(), &app.courses.snapshot()));
            result.map(drop).map_err(CliError::from)
        }
        Command::Course { course_id } => show_course(app, &Id::from(course_id)).await,
        Command::CreateCourse { name, description } => {
            let course = app.courses.create(NewCourse { name, description }).await?;
            println!("created course {}  [{}]", course.name, course.id);
            Ok(())
        }
        Command::CreateModule { course_id, title, description, order } => {
            let course_id = Id::from(course_id);
            app.courses.get_by_id(&course_id).await?;
            let module = app
                .courses
                .create_module(&course_id, NewModule { title, description, order })
                .await?;
            println!("created module {}  [{}]\n", module.title, module.id);
            println!("{}", render::course_detail(&app.session.status(), &app.courses.snapshot()));
            Ok(())
        }
        Command::CreateUnit { course_id, module_id, title, unit_type, content, order } => {
            let course_id = Id::from(course_id);
            app.courses.get_by_id(&course_id).await?;
            let unit = app
                .courses
                .create_unit(&course_id, &Id::from(module_id), NewUnit { title, unit_type, content, order })
                .await?;
            println!("created unit {}  [{}]\n", unit.title, unit.id);
            println!("{}", render::course_detail(&app.session.status(), &app.courses.snapshot()));
            Ok(())
        }
        Command::Modules { course_id } => {
            let modules = app.courses.list_modules(&Id::from(course_id)).await?;
            println!("{}", render::modules(&modules));
            Ok(())
        }
        Command::Units { module_id } => {
            let units = app.courses.list_units(&Id::from(module_id)).await?;
            println!("{}", render::units(&units));
            Ok(())
        }
    }
}

async fn show_course(app: &Classroom, course_id: &Id) -> Result<(), CliError> {
    let result = app.courses.get_by_id(course_id).await;
    println!("{}", render::course_detail(&app.session.status(), &app.courses.snapshot()));
    result.map(drop).map_err(CliError::from)
}
