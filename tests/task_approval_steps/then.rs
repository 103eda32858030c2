//! Then steps for approval lifecycle BDD scenarios.

use super::world::{ApprovalWorld, person, run_async};
use rstest_bdd_macros::then;
use signoff::task::{
    domain::Identity,
    ports::TaskStore,
    services::{InvalidTaskState, TaskLifecycleError},
};

#[then(r#"the review is archived as "{state}" decided by "{decider}""#)]
fn review_archived(
    world: &ApprovalWorld,
    state: String,
    decider: String,
) -> Result<(), eyre::Report> {
    let review_id = world.review()?.id();
    let history = run_async(world.store.find_his_task(review_id))?
        .ok_or_else(|| eyre::eyre!("review has no history record"))?;

    if history.terminal_state().as_str() != state {
        return Err(eyre::eyre!(
            "expected terminal state {state}, found {}",
            history.terminal_state()
        ));
    }
    let recorded = history.disposition().decider.as_ref().map(Identity::id);
    if recorded != Some(decider.as_str()) {
        return Err(eyre::eyre!("expected decider {decider}, found {recorded:?}"));
    }
    Ok(())
}

#[then(r#""{who}" can no longer complete the review"#)]
fn review_closed_for(world: &ApprovalWorld, who: String) -> Result<(), eyre::Report> {
    let review_id = world.review()?.id();
    let result = run_async(world.engine.complete(
        review_id,
        &person(&who),
        &serde_json::Map::new(),
    ));
    if !matches!(result, Err(TaskLifecycleError::NotFound(_))) {
        return Err(eyre::eyre!("expected review to be gone, got {result:?}"));
    }
    Ok(())
}

#[then(r#""{who}" holds the submission again"#)]
fn submission_restored(world: &ApprovalWorld, who: String) -> Result<(), eyre::Report> {
    if let Some(err) = &world.last_error {
        return Err(eyre::eyre!("undo failed: {err}"));
    }
    let instance_id = world.instance()?.id();
    let active = run_async(world.engine.active_tasks(instance_id))?;
    let restored = active
        .iter()
        .find(|task| task.task_name() == "submit")
        .ok_or_else(|| eyre::eyre!("no active submission task"))?;
    let holders = run_async(world.engine.task_actors(restored.id()))?;
    if !holders.iter().any(|row| row.actor_id() == who) {
        return Err(eyre::eyre!("{who} does not hold the restored submission"));
    }
    Ok(())
}

#[then("no review remains active")]
fn no_review_active(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let review_id = world.review()?.id();
    if run_async(world.store.find_task(review_id))?.is_some() {
        return Err(eyre::eyre!("review task is still active"));
    }
    Ok(())
}

#[then("the review is still active")]
fn review_still_active(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    let review_id = world.review()?.id();
    if run_async(world.store.find_task(review_id))?.is_none() {
        return Err(eyre::eyre!("review task is no longer active"));
    }
    Ok(())
}

#[then("the request fails because the submission is no longer withdrawable")]
fn withdraw_refused(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    if !matches!(
        world.last_error,
        Some(TaskLifecycleError::InvalidState(
            InvalidTaskState::NotWithdrawable(_)
        ))
    ) {
        return Err(eyre::eyre!(
            "expected not-withdrawable error, got {:?}",
            world.last_error
        ));
    }
    Ok(())
}

#[then("the request is denied")]
fn request_denied(world: &ApprovalWorld) -> Result<(), eyre::Report> {
    if !matches!(
        world.last_error,
        Some(TaskLifecycleError::PermissionDenied { .. })
    ) {
        return Err(eyre::eyre!(
            "expected permission denied, got {:?}",
            world.last_error
        ));
    }
    Ok(())
}
