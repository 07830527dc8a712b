use anyhow::Context;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use config::Config;
use features::{consensus, dishes, drafts, menus, sessions, tournament};
use middleware::auth::ApiKeys;
use state::{AppState, ConsensusSettings};

#[derive(OpenApi)]
#[openapi(
    paths(
        dishes::handlers::list_dishes,
        dishes::handlers::dish_stats,
        dishes::handlers::get_deck,
        dishes::handlers::get_dish,
        dishes::handlers::create_dish,
        dishes::handlers::update_dish,
        dishes::handlers::delete_dish,
        tournament::handlers::rank,
        drafts::handlers::create_draft,
        drafts::handlers::get_draft,
        drafts::handlers::delete_draft,
        drafts::handlers::record_swipes,
        drafts::handlers::play_match,
        drafts::handlers::choose_winner,
        drafts::handlers::submit_draft,
        menus::handlers::list_menus,
        menus::handlers::submit_menu,
        menus::handlers::list_participants,
        consensus::handlers::get_candidates,
        consensus::handlers::get_duels,
        consensus::handlers::list_votes,
        consensus::handlers::cast_vote,
        consensus::handlers::get_progress,
        consensus::handlers::get_results,
        consensus::handlers::confirm_menu,
        consensus::handlers::get_share,
        sessions::handlers::create_session,
        sessions::handlers::get_session,
        sessions::handlers::delete_session,
        sessions::handlers::select_course,
        sessions::handlers::back_to_dashboard,
        sessions::handlers::open_duel,
        sessions::handlers::vote,
        sessions::handlers::cancel,
        sessions::handlers::enter_waiting,
        sessions::handlers::reveal,
        sessions::handlers::confirm,
        sessions::handlers::share,
    ),
    components(
        schemas(
            storage::dto::dish::CreateDishRequest,
            storage::dto::dish::UpdateDishRequest,
            storage::dto::dish::DishStats,
            storage::dto::tournament::RankRequest,
            storage::dto::tournament::RankResponse,
            storage::dto::draft::CreateDraftRequest,
            storage::dto::draft::SwipesRequest,
            storage::dto::draft::PlayMatchRequest,
            storage::dto::draft::ChooseWinnerRequest,
            storage::dto::menu::SubmitMenuRequest,
            storage::dto::menu::ParticipantsResponse,
            storage::dto::consensus::CastVoteRequest,
            storage::dto::consensus::ConfirmMenuRequest,
            storage::dto::consensus::CandidatesResponse,
            storage::dto::consensus::ProgressResponse,
            storage::dto::consensus::ShareResponse,
            storage::dto::session::CreateSessionRequest,
            storage::dto::session::SelectCourseRequest,
            storage::dto::session::OpenDuelRequest,
            storage::dto::session::SessionVoteRequest,
            storage::dto::session::SessionResponse,
            storage::models::Course,
            storage::models::Dish,
            storage::models::ScoredDish,
            storage::models::UserMenu,
            storage::models::UserMenuWithDishes,
            storage::models::DuelVote,
            storage::models::FinalMenuRecord,
            storage::services::duels::Duel,
            storage::services::tournament::TournamentMatch,
            storage::services::tournament::TournamentResult,
            storage::services::tournament::Pairing,
            storage::services::tournament::BracketState,
            storage::services::draft::Swipe,
            storage::services::draft::SwipeDirection,
            storage::services::draft::CourseDraft,
            storage::services::draft::MenuDraft,
            storage::services::consensus::PairWins,
            storage::services::consensus::CourseOutcome,
            storage::services::consensus::FinalMenu,
            storage::services::consensus::TieSets,
            storage::services::consensus::ConsensusResolution,
            storage::services::progress::ParticipantProgress,
            storage::services::progress::ProgressReport,
            storage::services::session::View,
            storage::services::session::ConsensusSession,
        )
    ),
    tags(
        (name = "dishes", description = "Dish catalog and swipe decks"),
        (name = "tournament", description = "Stateless bracket ranking"),
        (name = "drafts", description = "Single-player menu drafts"),
        (name = "menus", description = "Submitted menus and participants"),
        (name = "consensus", description = "Pairwise duel voting and resolution"),
        (name = "sessions", description = "Per-participant consensus navigation"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting menu consensus API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!(
        expected_participants = config.expected_participants,
        poll_interval_secs = config.poll_interval_secs,
        "Configuration loaded successfully"
    );

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, catalog writes will be rejected");
    }

    let state = AppState::new(db, ConsensusSettings::from(&config));
    state::spawn_sweeper(
        state.clone(),
        std::time::Duration::from_secs(config.session_ttl_secs),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::api_router(api_keys)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
