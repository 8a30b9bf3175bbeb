//! # Tumblr publishing
//!
//! [`TumblrClient`] implements [`Publisher`] against the Tumblr v2 API using
//! NPF (Neue Post Format) posts and OAuth2 bearer authentication.
//!
//! [`PostCursorStore`] implements [`CursorStore`] on top of a dedicated
//! "config" post on the same blog. The post's first text block holds the
//! cursor document as YAML. It is read once when the store is loaded, and
//! every write edits the post in place.
//!
//! The request bodies are built by plain functions ([`create_post_body`],
//! [`cursor_post_body`]) and responses are read by [`created_post_id`] and
//! [`parse_cursor_post`], so their shapes can be tested without a network.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use division_bot_core::contract::{ClientError, CursorStore, NewPost, Publisher};
use division_bot_core::cursor::CursorDocument;
use division_bot_core::report::ContentBlock;
use division_bot_core::Chamber;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Mutex;
use tracing::{error, info};

use crate::parliament::{fetch_json, http_client};

/// Tags written on every cursor post edit, after which the timestamp tag follows.
pub const CURSOR_POST_TAGS: [&str; 2] = [
    "config",
    "this post exists to store config data because it's easier than some local method",
];
/// Keeps the cursor post out of the blog's main tag.
pub const CURSOR_POST_TRAILING_TAG: &str = "non-wankerwatch";

/// Body for `POST /v2/blog/{blog}/posts`. Tags are sent comma-joined.
pub fn create_post_body(post: &NewPost) -> Result<Value, ClientError> {
    Ok(json!({
        "content": serde_json::to_value(&post.content)?,
        "layout": serde_json::to_value(&post.layout)?,
        "tags": post.tags.join(","),
    }))
}

/// Id of the post created by a `POST …/posts` call.
pub fn created_post_id(response: &Value) -> Result<String, ClientError> {
    let created = &response["response"];
    let id = created
        .get("id_string")
        .or_else(|| created.get("id"))
        .ok_or("create post response has no post id")?;
    match id {
        Value::String(id) => Ok(id.clone()),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(format!("unexpected post id in create post response: {other}").into()),
    }
}

/// Cursor document held in the first text block of the config post.
pub fn parse_cursor_post(response: &Value) -> Result<CursorDocument, ClientError> {
    let text = response["response"]["content"][0]["text"]
        .as_str()
        .ok_or("config post has no leading text block")?;
    Ok(CursorDocument::from_yaml(text)?)
}

/// Body for the `PUT …/posts/{id}` that rewrites the config post.
pub fn cursor_post_body(
    document: &CursorDocument,
    updated: DateTime<Utc>,
) -> Result<Value, ClientError> {
    let content = vec![ContentBlock::plain(document.to_yaml()?)];
    let mut tags: Vec<String> = CURSOR_POST_TAGS.iter().map(|t| t.to_string()).collect();
    tags.push(format!(
        "updated: {}",
        updated.format("%Y-%m-%dT%H:%M:%S%.6f")
    ));
    tags.push(CURSOR_POST_TRAILING_TAG.to_string());

    Ok(json!({
        "content": serde_json::to_value(&content)?,
        "tags": tags.join(","),
    }))
}

/// Tumblr v2 API client bound to one blog.
#[derive(Clone)]
pub struct TumblrClient {
    http: Client,
    base_url: String,
    blog: String,
    token: String,
}

impl TumblrClient {
    pub fn new(base_url: &str, blog: &str, token: &str) -> Result<Self, ClientError> {
        info!(blog, token_set = !token.is_empty(), "Initialized TumblrClient");
        Ok(Self {
            http: http_client(None)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            blog: blog.to_string(),
            token: token.to_string(),
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/v2/blog/{}/posts", self.base_url, self.blog)
    }

    /// Fetch one post in NPF form.
    pub async fn get_post(&self, post_id: i64) -> Result<Value, ClientError> {
        let url = format!("{}/{}", self.posts_url(), post_id);
        let request = self.http.get(&url).bearer_auth(&self.token);
        fetch_json(request, "tumblr get post").await
    }

    /// Replace a post's content and tags.
    pub async fn edit_post(&self, post_id: i64, body: &Value) -> Result<(), ClientError> {
        let url = format!("{}/{}", self.posts_url(), post_id);
        let request = self.http.put(&url).bearer_auth(&self.token).json(body);
        let _: Value = fetch_json(request, "tumblr edit post").await?;
        Ok(())
    }
}

#[async_trait]
impl Publisher for TumblrClient {
    async fn create_post(&self, post: &NewPost) -> Result<String, ClientError> {
        info!(
            blog = %self.blog,
            blocks = post.content.len(),
            tags = post.tags.len(),
            "Creating post"
        );
        let body = create_post_body(post)?;
        let request = self
            .http
            .post(self.posts_url())
            .bearer_auth(&self.token)
            .json(&body);
        let response: Value = fetch_json(request, "tumblr create post").await?;
        let post_id = created_post_id(&response).map_err(|e| {
            error!(error = ?e, "Created post but could not read its id");
            e
        })?;
        info!(post_id = %post_id, "Successfully created post");
        Ok(post_id)
    }
}

/// Cursor store backed by a config post on the blog.
pub struct PostCursorStore {
    client: TumblrClient,
    post_id: i64,
    document: Mutex<CursorDocument>,
}

impl PostCursorStore {
    /// Read the config post once and cache its cursors.
    pub async fn load(client: TumblrClient, post_id: i64) -> Result<Self, ClientError> {
        let response = client.get_post(post_id).await?;
        let document = parse_cursor_post(&response).map_err(|e| {
            error!(error = ?e, post_id, "Config post does not hold a cursor document");
            e
        })?;
        info!(
            post_id,
            last_commons_vote = document.last_commons_vote,
            last_lords_vote = document.last_lords_vote,
            "Loaded cursors from config post"
        );
        Ok(Self {
            client,
            post_id,
            document: Mutex::new(document),
        })
    }

    fn snapshot(&self) -> Result<CursorDocument, ClientError> {
        let document = self
            .document
            .lock()
            .map_err(|_| "cursor cache lock poisoned")?;
        Ok(*document)
    }
}

#[async_trait]
impl CursorStore for PostCursorStore {
    async fn read_cursor(&self, chamber: Chamber) -> Result<i64, ClientError> {
        Ok(self.snapshot()?.get(chamber))
    }

    async fn write_cursor(&self, chamber: Chamber, division_id: i64) -> Result<(), ClientError> {
        let mut next = self.snapshot()?;
        next.set(chamber, division_id);

        let body = cursor_post_body(&next, Utc::now())?;
        self.client.edit_post(self.post_id, &body).await?;

        *self
            .document
            .lock()
            .map_err(|_| "cursor cache lock poisoned")? = next;
        info!(%chamber, division_id, post_id = self.post_id, "Config post saved");
        Ok(())
    }
}
