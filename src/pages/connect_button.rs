use leptos::*;
use crate::core::{MintController, WalletHandle};
use crate::core::links::short_address;
use crate::core::mint_flow::connect_wallet;
use crate::core::error::WalletError;

#[component]
pub fn ConnectButton(
    controller: RwSignal<MintController>,
    wallet: WalletHandle,
) -> impl IntoView {
    let wallet = store_value(wallet);
    let (is_connecting, set_is_connecting) = create_signal(false);
    let (error_message, set_error_message) = create_signal(String::new());
    let (wallet_missing, set_wallet_missing) = create_signal(false);

    let address = create_memo(move |_| controller.with(|c| c.address()));

    let handle_connect = move |_| {
        set_is_connecting.set(true);
        set_error_message.set(String::new());

        let wallet = wallet.get_value();
        spawn_local(async move {
            match connect_wallet(wallet.provider(), &controller).await {
                Ok(()) => log::info!("Wallet connection approved"),
                Err(WalletError::ProviderNotFound) => {
                    log::warn!("No injected wallet to connect to");
                    set_wallet_missing.set(true);
                }
                Err(e) => {
                    log::error!("Failed to connect wallet: {}", e);
                    set_error_message.set(format!("Failed to connect: {}", e));
                }
            }
            set_is_connecting.set(false);
        });
    };

    view! {
        <div class="wallet-container">
            {move || match address.get() {
                Some(addr) => view! {
                    <button class="wallet-btn connected" title=addr.to_string()>
                        {short_address(&addr)}
                    </button>
                }.into_view(),
                None => view! {
                    <button
                        class="wallet-btn"
                        on:click=handle_connect
                        disabled=move || is_connecting.get()
                    >
                        {move || if is_connecting.get() {
                            "Connecting..."
                        } else {
                            "Connect Wallet"
                        }}
                    </button>
                }.into_view(),
            }}

            <Show when=move || wallet_missing.get()>
                <div class="error-message">
                    "No Ethereum wallet was found in this browser. "
                    <a href="https://ethereum.org/en/wallets/find-wallet/" target="_blank" rel="noreferrer">
                        "Get a wallet"
                    </a>
                </div>
            </Show>

            <Show when=move || !error_message.get().is_empty()>
                <div class="error-message">{move || error_message.get()}</div>
            </Show>
        </div>
    }
}
