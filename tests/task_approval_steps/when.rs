//! When steps for approval lifecycle BDD scenarios.

use super::world::{ApprovalWorld, person, run_async};
use rstest_bdd_macros::when;

#[when(r#""{who}" completes the review"#)]
fn complete_review(world: &mut ApprovalWorld, who: String) -> Result<(), eyre::Report> {
    let review_id = world.review()?.id();
    let result = run_async(world.engine.complete(
        review_id,
        &person(&who),
        &serde_json::Map::new(),
    ));
    world.record(result);
    Ok(())
}

#[when(r#""{who}" rejects the review"#)]
fn reject_review(world: &mut ApprovalWorld, who: String) -> Result<(), eyre::Report> {
    let review_id = world.review()?.id();
    let result = run_async(world.engine.reject(
        review_id,
        &person(&who),
        &serde_json::Map::new(),
    ));
    world.record(result);
    Ok(())
}

#[when(r#""{who}" withdraws the submission"#)]
fn withdraw_submission(world: &mut ApprovalWorld, who: String) -> Result<(), eyre::Report> {
    let submission_id = world.submission()?.id();
    let result = run_async(world.engine.withdraw(submission_id, &person(&who)));
    world.record(result);
    Ok(())
}
