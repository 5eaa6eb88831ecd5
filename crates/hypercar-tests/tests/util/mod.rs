use eyre::Result;
use hypercar_tests::{Api, IssuedTicket, ServiceType};

/// Requests one ticket per entry of `types`, in order.
#[allow(unused)]
pub async fn get_tickets(api: &Api, types: &[ServiceType]) -> Result<Vec<IssuedTicket>> {
    let mut tickets = Vec::with_capacity(types.len());
    for ty in types {
        tickets.push(api.get_ticket(*ty).await??);
    }
    Ok(tickets)
}

/// Calls tickets to processing until no client is waiting and checks that the
/// "now serving" display follows along.
#[allow(unused)]
pub async fn drain(api: &Api) -> Result<Vec<u32>> {
    let mut called = Vec::new();
    while let Some(number) = api.call_next().await?? {
        assert_eq!(
            api.next_ticket().await??,
            Some(number),
            "The called ticket must be the one being processed."
        );
        called.push(number);
    }
    assert_eq!(
        api.processing_status().await??,
        [0, 0, 0],
        "After calling every client, all queues must be empty."
    );
    Ok(called)
}
