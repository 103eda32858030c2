//! End-to-end approval flows over the in-memory store.

use super::helpers::{Workflow, complete, node, person, user, workflow};
use signoff::task::{
    domain::{Actor, NodeKind, NodeModel, ParticipationType, Task, TerminalState},
    services::TaskLifecycleError,
};
use rstest::rstest;
use serde_json::json;

fn only(tasks: Vec<Task>) -> Result<Task, eyre::Report> {
    eyre::ensure!(tasks.len() == 1, "expected one task, found {}", tasks.len());
    tasks
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("expected one task"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expense_claim_runs_through_every_strategy(workflow: Workflow) -> Result<(), eyre::Report> {
    let engine = &workflow.engine;
    let submit_node = NodeModel::new("submit", NodeKind::Initiator)?
        .with_participants([user("alice")]);
    let submit = only(engine.create_tasks_for_node(&submit_node, &workflow.start()).await?)?;
    let mut claim = serde_json::Map::new();
    claim.insert("amount".to_owned(), json!(900));
    let submitted = engine.complete(submit.id(), &person("alice"), &claim).await?;

    let manager = only(
        engine
            .create_tasks_for_node(
                &node("manager", ParticipationType::Sequential, &["bob", "dave"]),
                &workflow.after(&submitted, "alice"),
            )
            .await?,
    )?;
    engine
        .advance_sequential(manager.id(), &person("bob"), user("dave"), &serde_json::Map::new())
        .await?;
    let denied = complete(engine, &manager, "bob").await;
    eyre::ensure!(denied.is_err(), "bob no longer holds the sequential task");
    let approved = complete(engine, &manager, "dave").await?;

    let signers = engine
        .create_tasks_for_node(
            &node("countersign", ParticipationType::AllRequired, &["erin", "frank"]),
            &workflow.after(&approved, "dave"),
        )
        .await?;
    eyre::ensure!(signers.len() == 2, "one countersign task per signer");
    let mut last_signature = None;
    for (task, who) in signers.iter().zip(["erin", "frank"]) {
        last_signature = Some(complete(engine, task, who).await?);
    }
    let last_signature = last_signature.ok_or_else(|| eyre::eyre!("no signature recorded"))?;

    let payout_node = NodeModel::new("notify", NodeKind::CarbonCopy)?
        .with_participants([user("gina")])
        .with_child(
            NodeModel::new("payout", NodeKind::Approval)?
                .with_participation(ParticipationType::AnyOf)
                .with_participants([Actor::role("finance", "Finance")]),
        );
    let payout = only(
        engine
            .create_tasks_for_node(&payout_node, &workflow.after(&last_signature, "frank"))
            .await?,
    )?;
    let paid = complete(engine, &payout, "hank").await?;

    eyre::ensure!(
        paid.variables().get("amount") == Some(&json!(900)),
        "claim variables flow through every step"
    );
    let instance_id = workflow.instance.id();
    eyre::ensure!(engine.active_tasks(instance_id).await?.is_empty(), "no work left");
    let history = engine.historic_tasks(instance_id).await?;
    let names: Vec<&str> = history.iter().map(|record| record.task_name()).collect();
    eyre::ensure!(
        names == ["submit", "manager", "countersign", "countersign", "payout"],
        "unexpected history order {names:?}"
    );
    eyre::ensure!(
        history
            .iter()
            .all(|record| record.terminal_state() == TerminalState::Finished),
        "every step finished"
    );
    eyre::ensure!(
        engine.carbon_copies(instance_id).await?.len() == 1,
        "one carbon-copy notice"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_claim_returns_to_the_submitter(workflow: Workflow) -> Result<(), eyre::Report> {
    let engine = &workflow.engine;
    let submit = only(
        engine
            .create_tasks_for_node(
                &node("submit", ParticipationType::Direct, &["alice"]),
                &workflow.start(),
            )
            .await?,
    )?;
    complete(engine, &submit, "alice").await?;
    let review = only(
        engine
            .create_tasks_for_node(
                &node("review", ParticipationType::AnyOf, &["bob", "dave"]),
                &workflow.after(&submit, "alice"),
            )
            .await?,
    )?;

    let resubmit = engine
        .reject(review.id(), &person("dave"), &serde_json::Map::new())
        .await?;

    let holders: Vec<String> = engine
        .task_actors(resubmit.id())
        .await?
        .into_iter()
        .map(|row| row.actor_id().to_owned())
        .collect();
    eyre::ensure!(holders == ["alice"], "submitter holds the task again");
    let archived = engine
        .his_task_actors(review.id())
        .await?
        .len();
    eyre::ensure!(archived == 2, "rejected task keeps its participants in history");
    complete(engine, &resubmit, "alice").await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn department_members_share_a_task(workflow: Workflow) -> Result<(), eyre::Report> {
    let engine = &workflow.engine;
    let audit = NodeModel::new("audit", NodeKind::Approval)?
        .with_participation(ParticipationType::AnyOf)
        .with_participants([Actor::department("audit", "Audit")]);
    let task = only(engine.create_tasks_for_node(&audit, &workflow.start()).await?)?;

    let outsider = complete(engine, &task, "hank").await;
    let member = complete(engine, &task, "ivy").await;

    eyre::ensure!(outsider.is_err(), "finance does not belong to audit");
    eyre::ensure!(member.is_ok(), "audit member completes the task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn withdrawn_submission_can_be_resubmitted(workflow: Workflow) -> Result<(), eyre::Report> {
    let engine = &workflow.engine;
    let submit = only(
        engine
            .create_tasks_for_node(
                &node("submit", ParticipationType::Direct, &["alice"]),
                &workflow.start(),
            )
            .await?,
    )?;
    complete(engine, &submit, "alice").await?;
    let review = only(
        engine
            .create_tasks_for_node(
                &node("review", ParticipationType::AnyOf, &["bob"]),
                &workflow.after(&submit, "alice"),
            )
            .await?,
    )?;

    let restored = engine.withdraw(submit.id(), &person("alice")).await?;
    let again = engine.withdraw(submit.id(), &person("alice")).await;

    eyre::ensure!(
        workflow.store_has_no(review.id()).await?,
        "review was discarded"
    );
    eyre::ensure!(
        matches!(again, Err(TaskLifecycleError::InvalidState(_))),
        "second withdraw has nothing left to pull back"
    );
    complete(engine, &restored, "alice").await?;
    Ok(())
}
