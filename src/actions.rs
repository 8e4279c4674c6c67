use crate::api::ApiClient;
use crate::error::ClientError;
use crate::state::{ClientPhase, Store, ToastKind};
use crate::types::ActionResponse;

/// Client-side validation of a trade amount. Runs before any network call —
/// a rejected amount never leaves the process.
pub fn parse_amount(raw: &str) -> Result<u32, ClientError> {
    let amount: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ClientError::Validation("Введите количество".to_string()))?;
    if amount < 1 {
        return Err(ClientError::Validation("Введите количество".to_string()));
    }
    Ok(amount)
}

fn require_ready(store: &Store) -> Result<(), ClientError> {
    if store.is_ready() {
        Ok(())
    } else {
        Err(ClientError::AuthRequired)
    }
}

/// Fire-and-forget command submission: on success, toast + immediate player
/// state refresh (the server owns all arithmetic — the client never adjusts
/// money or stock locally); on failure, toast and leave state untouched. No
/// retry: actions are user-triggered and re-clickable.
pub async fn buy_resource(
    api: &ApiClient,
    store: &Store,
    resource: &str,
    amount_raw: &str,
) -> Result<(), ClientError> {
    let amount = parse_amount(amount_raw)?;
    require_ready(store)?;
    let resp = api
        .buy_resource(resource, amount)
        .await
        .map_err(ClientError::Transient)?;
    settle(store, resp, "Ресурс куплен", "Ошибка покупки")
}

pub async fn sell_resource(
    api: &ApiClient,
    store: &Store,
    resource: &str,
    amount_raw: &str,
) -> Result<(), ClientError> {
    let amount = parse_amount(amount_raw)?;
    require_ready(store)?;
    let resp = api
        .sell_resource(resource, amount)
        .await
        .map_err(ClientError::Transient)?;
    settle(store, resp, "Ресурс продан", "Ошибка продажи")
}

pub async fn build(api: &ApiClient, store: &Store, building_name: &str) -> Result<(), ClientError> {
    require_ready(store)?;
    let resp = api
        .build(building_name)
        .await
        .map_err(ClientError::Transient)?;
    settle(store, resp, "Объект начат", "Ошибка строительства")
}

pub async fn sell_building(
    api: &ApiClient,
    store: &Store,
    building_id: &str,
) -> Result<(), ClientError> {
    require_ready(store)?;
    let resp = api
        .sell_building(building_id)
        .await
        .map_err(ClientError::Transient)?;
    settle(
        store,
        resp,
        "Объект выставлен на продажу",
        "Ошибка продажи объекта",
    )
}

/// Onboarding submission. On success the client enters authenticated mode
/// and the poll loop picks up its full cadence.
pub async fn submit_onboarding(
    api: &ApiClient,
    store: &Store,
    nickname: &str,
    photo_url: Option<&str>,
) -> Result<(), ClientError> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        return Err(ClientError::Validation("Введите никнейм".to_string()));
    }
    if nickname.chars().count() < 2 {
        return Err(ClientError::Validation(
            "Никнейм должен быть не менее 2 символов".to_string(),
        ));
    }
    let resp = api
        .authorize(nickname, photo_url)
        .await
        .map_err(ClientError::Transient)?;
    if resp.success {
        store.set_phase(ClientPhase::Ready);
        store.push_toast(ToastKind::Success, format!("Добро пожаловать, {nickname}!"));
        store.request_refresh();
        Ok(())
    } else {
        Err(ClientError::Rejected(
            resp.message
                .unwrap_or_else(|| "Ошибка сохранения данных".to_string()),
        ))
    }
}

fn settle(
    store: &Store,
    resp: ActionResponse,
    success_fallback: &str,
    failure_fallback: &str,
) -> Result<(), ClientError> {
    if resp.success {
        store.push_toast(
            ToastKind::Success,
            resp.message.unwrap_or_else(|| success_fallback.to_string()),
        );
        store.request_refresh();
        Ok(())
    } else {
        Err(ClientError::Rejected(
            resp.message.unwrap_or_else(|| failure_fallback.to_string()),
        ))
    }
}
