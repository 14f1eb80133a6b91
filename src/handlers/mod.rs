/// HTTP surface of yatube-service
///
/// Reads return JSON; form-style writes (create/edit/comment/follow/unfollow)
/// answer 303 See Other with a Location header pointing at the view to land
/// on next.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod profiles;

use crate::middleware::AuthMiddleware;
use actix_web::dev::HttpServiceFactory;
use actix_web::{http::header, web, HttpResponse};

/// Redirect used after successful (or silently refused) form-style writes.
pub(crate) fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn post_url(post_id: uuid::Uuid) -> String {
    format!("/api/v1/posts/{post_id}")
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/api/v1/profiles/{username}")
}

/// The full `/api/v1` route tree, shared by `main` and the test harness.
pub fn api_scope(auth: AuthMiddleware) -> impl HttpServiceFactory {
    web::scope("/api/v1")
        .service(
            web::scope("/posts")
                .service(
                    web::resource("")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .service(
                    web::resource("/{post_id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::post().to(posts::edit_post)),
                )
                .service(
                    web::resource("/{post_id}/comments")
                        .route(web::get().to(comments::list_comments))
                        .route(web::post().to(comments::create_comment)),
                ),
        )
        .service(web::resource("/groups/{slug}").route(web::get().to(groups::get_group)))
        .service(
            web::scope("/profiles")
                .service(web::resource("/{username}").route(web::get().to(profiles::get_profile)))
                .service(
                    web::resource("/{username}/follow")
                        .route(web::post().to(follows::follow_author)),
                )
                .service(
                    web::resource("/{username}/unfollow")
                        .route(web::post().to(follows::unfollow_author)),
                ),
        )
        .service(web::resource("/feed").route(web::get().to(follows::feed)))
        .wrap(auth)
}
