//! Given steps for approval lifecycle BDD scenarios.

use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use signoff::task::domain::{Actor, Execution, Instance, NodeKind, NodeModel, ParticipationType};

use super::world::{ApprovalWorld, person, run_async};

#[given(r#"an expense claim submitted by "{submitter}""#)]
fn expense_claim_submitted(
    world: &mut ApprovalWorld,
    submitter: String,
) -> Result<(), eyre::Report> {
    let instance = Instance::new("expense-claim", person(&submitter), &DefaultClock);
    world
        .store
        .register_instance(instance.clone())
        .wrap_err("register expense claim instance")?;
    let node = NodeModel::new("submit", NodeKind::Initiator)?
        .with_participants([Actor::user(submitter.clone(), submitter.to_uppercase())]);
    let execution = Execution::new(instance.clone(), person(&submitter));
    let created = run_async(world.engine.create_tasks_for_node(&node, &execution))
        .wrap_err("create submission task")?;
    let submit = created
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("submission node created no task"))?;
    let submitted = run_async(world.engine.complete(
        submit.id(),
        &person(&submitter),
        &serde_json::Map::new(),
    ))
    .wrap_err("complete submission task")?;

    world.instance = Some(instance);
    world.submission = Some(submitted);
    Ok(())
}

#[given(r#"a "{step}" step shared by "{first}" and "{second}""#)]
fn review_step_shared(
    world: &mut ApprovalWorld,
    step: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let submission = world.submission()?.clone();
    let instance = world.instance()?.clone();
    let submitter = submission
        .creator()
        .cloned()
        .ok_or_else(|| eyre::eyre!("submission has no creator"))?;
    let node = NodeModel::new(step, NodeKind::Approval)?
        .with_participation(ParticipationType::AnyOf)
        .with_participants([
            Actor::user(first.clone(), first.to_uppercase()),
            Actor::user(second.clone(), second.to_uppercase()),
        ]);
    let execution = Execution::new(instance, submitter).with_task(submission);
    let created = run_async(world.engine.create_tasks_for_node(&node, &execution))
        .wrap_err("create review task")?;

    world.review = created.into_iter().next();
    Ok(())
}
