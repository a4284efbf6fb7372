use anyhow::Result;

use super::projects::resolve_workspace;
use super::Session;
use crate::client::PropagationMode;
use crate::render;

/// Under `Abort`, `settle` yields `Ok(Some(_))` or `Err`; the `else` arms below never run.
const MODE: PropagationMode = PropagationMode::Abort;

pub async fn me(session: &Session<'_>) -> Result<bool> {
    let Some(user) = MODE.settle(session.client.me().await)? else {
        return Ok(false);
    };
    println!("{}", render::me(&user));
    Ok(true)
}

pub async fn list_users(session: &Session<'_>, workspace_id: Option<&str>) -> Result<bool> {
    let Some(workspace_id) = resolve_workspace(session, workspace_id).await? else {
        return Ok(true);
    };
    let Some(users) = MODE.settle(session.client.list_users(&workspace_id).await)? else {
        return Ok(false);
    };
    println!("Users in workspace {workspace_id}:");
    for user in &users {
        println!("{}", render::user_row(user));
    }
    Ok(true)
}
