use log2::info;

use crate::store::{Actor, Store, StoreError};

/// Creates an actor and grants what every new actor gets: staff status and
/// permission to view pages.
pub async fn register_actor(store: &Store, name: &str, is_superuser: bool) -> Result<Actor, StoreError> {
    let actor = store.create_actor(name, is_superuser).await?;
    let actor = grant_default_permissions(store, &actor).await?;
    info!("Registered actor {} (superuser: {})", actor.name, actor.is_superuser);
    Ok(actor)
}

pub async fn grant_default_permissions(store: &Store, actor: &Actor) -> Result<Actor, StoreError> {
    store.grant_view_pages(actor.id).await
}
