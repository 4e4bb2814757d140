use leptos::*;
use crate::core::{MintController, MintView, SuccessView, WalletHandle};
use crate::core::celebration::{celebrate, EdgeTrigger};
use crate::core::links::collection_url;
use crate::core::mint_flow::refresh_preparation;
use crate::pages::connect_button::ConnectButton;
use crate::pages::mint_form::MintForm;

// Which block of the page is shown; the form keeps its DOM while it stays visible
#[derive(Clone, Debug, PartialEq)]
enum Screen {
    Disconnected,
    Form,
    Success(SuccessView),
}

#[component]
pub fn MintPage(
    controller: RwSignal<MintController>,
    wallet: WalletHandle,
) -> impl IntoView {
    let stored_wallet = store_value(wallet.clone());
    let config = controller.with_untracked(|c| c.config());

    let screen = create_memo(move |_| match controller.with(|c| c.view()) {
        MintView::Disconnected => Screen::Disconnected,
        MintView::Form(_) => Screen::Form,
        MintView::Success(success) => Screen::Success(success),
    });

    // re-simulate the call whenever the sender, the network or the quantity changes
    let call_inputs = create_memo(move |_| controller.with(|c| (c.address(), c.chain_id(), c.quantity())));
    create_effect(move |_| {
        let (address, _chain_id, quantity) = call_inputs.get();
        if address.is_none() {
            return;
        }
        log::debug!("Call inputs changed, preparing mint of {}", quantity);
        let wallet = stored_wallet.get_value();
        spawn_local(async move {
            refresh_preparation(wallet.provider(), &controller).await;
        });
    });

    // confetti on the false -> true edge of "minted", never on re-renders
    let minted = create_memo(move |_| controller.with(|c| c.is_minted()));
    create_effect(move |previous: Option<EdgeTrigger>| {
        let mut trigger = previous.unwrap_or_default();
        if trigger.observe(minted.get()) {
            celebrate();
        }
        trigger
    });

    view! {
        <div class="mint-page">
            <div class="logo-container">
                <img src="/img/logo.svg" alt="Stupid Faces logo" />
            </div>

            <ConnectButton controller=controller wallet=wallet.clone() />

            {move || match screen.get() {
                Screen::Disconnected => view! { <div></div> }.into_view(),
                Screen::Form => view! {
                    <MintForm controller=controller wallet=stored_wallet.get_value() />
                }.into_view(),
                Screen::Success(success) => view! {
                    <div class="status">"Success!"</div>
                    <div class="action">
                        <a href=success.marketplace_url target="_blank" rel="noreferrer">
                            "View on OpenSea"
                        </a>
                    </div>
                    <div class="action">
                        <a href=success.transaction_url target="_blank" rel="noreferrer">
                            "View transaction"
                        </a>
                    </div>
                }.into_view(),
            }}

            <div class="opensea">
                <a href=collection_url(config) target="_blank" rel="noreferrer">
                    <img src="/img/opensea.svg" width="50" height="50" alt="OpenSea logo" />
                </a>
            </div>
        </div>
    }
}
