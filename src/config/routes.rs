use actix_web::web;

use crate::controllers::{
    community_controller, health_controller, otp_controller, user_controller,
};

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health_controller::health))
        .service(
            web::scope("/api/otp")
                .route("/generate", web::post().to(otp_controller::generate_otp))
                .route("/resend", web::post().to(otp_controller::resend_otp))
                .route("/verify", web::post().to(otp_controller::verify_otp))
                .route(
                    "/profile-verify",
                    web::post().to(otp_controller::profile_verify_otp),
                ),
        )
        .service(
            web::scope("/api/auth")
                .route("/login", web::post().to(user_controller::login))
                .route(
                    "/refresh-token",
                    web::post().to(user_controller::refresh_token),
                )
                .route("/logout", web::post().to(user_controller::logout)),
        )
        .service(
            web::scope("/api/users")
                .route("/signup", web::post().to(user_controller::signup))
                .route("/me", web::get().to(user_controller::me))
                .route("/role", web::patch().to(user_controller::set_role))
                .route("/{id}", web::get().to(user_controller::get_user)),
        )
        .service(
            web::scope("/api/communities")
                .route("", web::get().to(community_controller::list))
                .route("", web::post().to(community_controller::create))
                .route("/{id}", web::get().to(community_controller::get))
                .route("/{id}", web::patch().to(community_controller::update))
                .route("/{id}", web::delete().to(community_controller::delete)),
        );
}
