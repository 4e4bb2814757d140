use leptos::*;
use crate::core::{MintController, MintView, Quantity, WalletHandle};
use crate::core::constants::{MIN_QUANTITY, MAX_QUANTITY, COLLECTION_NAME};
use crate::core::mint_flow::{execute_mint, switch_network};

/// Quantity slider, price readout, mint button and attempt status
#[component]
pub fn MintForm(
    controller: RwSignal<MintController>,
    wallet: WalletHandle,
) -> impl IntoView {
    let wallet = store_value(wallet);

    let form = create_memo(move |_| match controller.with(|c| c.view()) {
        MintView::Form(form) => Some(form),
        _ => None,
    });
    let slider_enabled = move || form.with(|v| v.as_ref().map(|f| f.slider_enabled).unwrap_or(false));
    let mint_enabled = move || form.with(|v| v.as_ref().map(|f| f.mint_enabled).unwrap_or(false));
    let wrong_network = move || form.with(|v| v.as_ref().map(|f| f.wrong_network).unwrap_or(false));

    let handle_quantity = move |ev: ev::Event| {
        match Quantity::from_slider(&event_target_value(&ev)) {
            Ok(quantity) => controller.update(|c| {
                c.set_quantity(quantity);
            }),
            Err(e) => log::warn!("Ignoring slider value: {}", e),
        }
    };

    let handle_mint = move |_| {
        let wallet = wallet.get_value();
        spawn_local(async move {
            execute_mint(wallet.provider(), &controller).await;
        });
    };

    let handle_switch = move |_| {
        let wallet = wallet.get_value();
        spawn_local(async move {
            if let Err(e) = switch_network(wallet.provider(), &controller).await {
                log::error!("Failed to switch network: {}", e);
            }
        });
    };

    view! {
        <div class="mint-form">
            // price first, then the slider
            <div class="price">
                "You are about to mint "
                <strong>{move || controller.with(|c| c.quantity().to_string())}</strong>
                " " {COLLECTION_NAME} " "
                {move || controller.with(|c| c.quantity().noun())}
                " for a total of "
                <strong>{move || controller.with(|c| c.quantity().display_total())}</strong>
                ". Move the slider below to adjust the quantity."
            </div>

            <input
                type="range"
                class="quantity-slider"
                aria-label="Quantity"
                min=MIN_QUANTITY.to_string()
                max=MAX_QUANTITY.to_string()
                step="1"
                prop:value=move || controller.with(|c| c.quantity().get().to_string())
                on:input=handle_quantity
                disabled=move || !slider_enabled()
            />

            <button
                class="mint-btn"
                on:click=handle_mint
                disabled=move || !mint_enabled()
            >
                "Mint"
            </button>

            {move || form.with(|v| v.as_ref().and_then(|f| f.status)).map(|status| view! {
                <div class="status">{status.text()}</div>
            })}

            {move || form.with(|v| v.as_ref().and_then(|f| f.transaction_url.clone())).map(|url| view! {
                <div class="action">
                    <a href=url target="_blank" rel="noreferrer">"View transaction"</a>
                </div>
            })}

            {move || form.with(|v| v.as_ref().and_then(|f| f.preparation_error)).map(|message| view! {
                <div class="error">{message}</div>
            })}

            <Show when=wrong_network>
                <button class="switch-btn" on:click=handle_switch>"Switch network"</button>
            </Show>

            {move || form.with(|v| v.as_ref().and_then(|f| f.mint_error)).map(|message| view! {
                <div class="error">{message}</div>
            })}
        </div>
    }
}
