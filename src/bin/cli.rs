use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use registrar::cli::{create_course, describe_enrollment_number};
use registrar_config::DatabaseConfig;
use registrar_db::{init_db_pool, run_migrations};
use registrar_models::CourseCode;

#[derive(Parser)]
#[command(name = "registrar-cli")]
#[command(about = "Registrar CLI - Administrative tools for student admissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new course
    CreateCourse {
        /// Course code (BCA, MCA, BBA, MBA, BCOM, MCOM)
        #[arg(short = 'c', long, value_parser = parse_course_code)]
        code: CourseCode,

        /// Display name of the course
        #[arg(short = 'n', long)]
        name: String,

        /// Course length in years
        #[arg(short = 'd', long)]
        duration_years: i32,
    },
    /// Decode an enrollment number such as 2024BCA001
    ParseEnrollment {
        value: String,
    },
}

fn parse_course_code(value: &str) -> Result<CourseCode, String> {
    value
        .to_uppercase()
        .parse()
        .map_err(|e: registrar_models::courses::UnknownCourseCode| e.to_string())
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateCourse {
            code,
            name,
            duration_years,
        } => handle_create_course(code, &name, duration_years).await,
        Commands::ParseEnrollment { value } => match describe_enrollment_number(&value) {
            Ok(description) => println!("{description}"),
            Err(e) => {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
        },
    }
}

async fn handle_create_course(code: CourseCode, name: &str, duration_years: i32) {
    let config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let pool = match init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        eprintln!("❌ Failed to run migrations: {e}");
        std::process::exit(1);
    }

    match create_course(&pool, code, name, duration_years).await {
        Ok(course) => {
            println!("✅ Course created successfully!");
            println!("   ID: {}", course.id);
            println!("   Code: {}", course.code);
            println!("   Name: {}", course.name);
            println!("   Duration: {} years", course.duration_years);
        }
        Err(e) => {
            eprintln!("❌ Error creating course: {e}");
            std::process::exit(1);
        }
    }
}
