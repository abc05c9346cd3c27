use axum::{routing::get, routing::post, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::audio::AUDIO_URL_PREFIX;
use crate::handlers;
use crate::paths;
use crate::state::AppState;

/// All pages, API endpoints and served directories
pub fn build_router(state: AppState) -> Router {
  let audio_dir = state.audio.dir().to_path_buf();

  Router::new()
    .route("/", get(handlers::index))
    .route("/exam", get(handlers::exam_page))
    .route("/play", get(handlers::play_redirect))
    .route("/stats", get(handlers::stats_page))
    .route("/incorrect", get(handlers::incorrect_page))
    .route("/reset", post(handlers::reset))
    .route("/api/exam/select", post(handlers::exam_select))
    .route("/api/exam/word", get(handlers::exam_word))
    .route("/api/exam/check", post(handlers::exam_check))
    .route("/api/exam/next", post(handlers::exam_next))
    .route("/api/exam/skip", post(handlers::exam_skip))
    .route("/api/exam/retry", post(handlers::exam_retry))
    .route("/api/exam/progress", get(handlers::exam_progress))
    .route("/api/learn/group/{group_num}", get(handlers::learn_group))
    .route("/check_word", post(handlers::check_word))
    .route("/api/audio/{word}", get(handlers::word_audio))
    .nest_service(AUDIO_URL_PREFIX, ServeDir::new(audio_dir))
    .nest_service("/static", ServeDir::new(paths::STATIC_DIR))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
