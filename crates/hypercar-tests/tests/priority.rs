use eyre::Result;
use hypercar_tests::{ServiceType, TestCtxBuilder};
use ServiceType::*;

mod util;

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_priority_then_arrival_order() -> Result<()> {
    let ctx = TestCtxBuilder::new().build().await?;

    let types = [
        Diagnostic,
        InflateTires,
        ChangeOil,
        Diagnostic,
        ChangeOil,
        InflateTires,
        ChangeOil,
    ];
    util::get_tickets(&ctx.api, &types).await?;
    assert_eq!(ctx.api.processing_status().await??, [3, 2, 2]);

    let called = util::drain(&ctx.api).await?;
    assert_eq!(
        called,
        [3, 5, 7, 2, 6, 1, 4],
        "Oil changes go first, then tire inflations, then diagnostics, each in arrival order."
    );

    ctx.finish().await
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_new_high_priority_ticket_jumps_ahead() -> Result<()> {
    let ctx = TestCtxBuilder::new().build().await?;
    let api = &ctx.api;

    util::get_tickets(api, &[Diagnostic, InflateTires]).await?;
    assert_eq!(api.call_next().await??, Some(2));

    // an oil change arriving late is still served before the diagnostic
    assert_eq!(api.get_ticket(ChangeOil).await??.number, 3);
    assert_eq!(api.call_next().await??, Some(3));
    assert_eq!(api.call_next().await??, Some(1));

    ctx.finish().await
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_empty_queues() -> Result<()> {
    let ctx = TestCtxBuilder::new().build().await?;
    let api = &ctx.api;

    assert_eq!(api.call_next().await??, None);
    assert_eq!(api.next_ticket().await??, None);
    assert_eq!(api.processing_status().await??, [0, 0, 0]);

    util::get_tickets(api, &[InflateTires]).await?;
    assert_eq!(api.call_next().await??, Some(1));

    // calling with nobody waiting keeps the current client
    assert_eq!(api.call_next().await??, None);
    assert_eq!(api.next_ticket().await??, Some(1));

    // numbering continues after the queues ran empty
    assert_eq!(api.get_ticket(Diagnostic).await??.number, 2);
    assert_eq!(api.get_ticket(Diagnostic).await??.wait_minutes, 30);

    ctx.finish().await
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_reads_do_not_change_state() -> Result<()> {
    let ctx = TestCtxBuilder::new().build().await?;
    let api = &ctx.api;

    util::get_tickets(api, &[Diagnostic, ChangeOil, InflateTires, ChangeOil]).await?;
    api.call_next().await??;

    let status = api.processing_status().await??;
    let current = api.next_ticket().await??;
    for _ in 0..10 {
        assert_eq!(api.processing_status().await??, status);
        assert_eq!(api.next_ticket().await??, current);
    }
    assert_eq!(status, [1, 1, 1]);
    assert_eq!(current, Some(2));

    ctx.finish().await
}
