use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject, ID};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::Extension;
use axum::response::{Html, IntoResponse};
use response_decorator::{
    ContextBag, CookieDirective, CookieOptions, HeaderDirective, SameSitePolicy,
};
use uuid::Uuid;

use crate::config::SessionConfig;

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Header naming the user a session was issued for.
pub const SESSION_USER_HEADER: &str = "X-Session-User";

#[derive(SimpleObject)]
pub struct Session {
    pub id: ID,
    pub username: String,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn ping(&self) -> String {
        "pong".to_string()
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Append a response header.
    async fn set_header(&self, ctx: &Context<'_>, key: String, value: String) -> Result<bool> {
        ctx.data::<ContextBag>()?
            .push_header(HeaderDirective::new(key, value));
        Ok(true)
    }

    /// Attach a cookie to the response.
    async fn set_cookie(
        &self,
        ctx: &Context<'_>,
        name: String,
        value: String,
        path: Option<String>,
    ) -> Result<bool> {
        let options = CookieOptions {
            path,
            ..CookieOptions::default()
        };
        ctx.data::<ContextBag>()?
            .push_cookie(CookieDirective::new(name, value).with_options(options));
        Ok(true)
    }

    /// Issue a session cookie for `username`.
    async fn login(&self, ctx: &Context<'_>, username: String) -> Result<Session> {
        let session = ctx.data::<SessionConfig>()?;
        let bag = ctx.data::<ContextBag>()?;
        let id = Uuid::new_v4().to_string();

        bag.push_cookie(
            CookieDirective::new(session.cookie_name.clone(), id.clone())
                .with_options(session_options(session, session.max_age_secs)),
        );
        bag.push_header(HeaderDirective::new(SESSION_USER_HEADER, username.clone()));

        tracing::info!(username = %username, "session issued");
        Ok(Session {
            id: ID::from(id),
            username,
        })
    }

    /// Expire the session cookie.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let session = ctx.data::<SessionConfig>()?;
        ctx.data::<ContextBag>()?.push_cookie(
            CookieDirective::new(session.cookie_name.clone(), "")
                .with_options(session_options(session, 0)),
        );
        Ok(true)
    }
}

fn session_options(session: &SessionConfig, max_age: i64) -> CookieOptions {
    CookieOptions {
        path: Some("/".to_string()),
        max_age: Some(max_age),
        http_only: true,
        secure: session.secure,
        same_site: Some(SameSitePolicy::Lax),
        ..CookieOptions::default()
    }
}

// GraphQL playground handler
pub async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

pub async fn graphql_handler(schema: Extension<ApiSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}
