use leptos::*;
use crate::core::{MintController, NetworkConfig, NetworkType, WalletHandle, InjectedWallet};
use crate::core::mint_flow::{sync_address, MintStore};
use crate::pages::MintPage;

// async mint steps write into the page signal through this
impl MintStore for RwSignal<MintController> {
    fn update_mint<R>(&self, f: impl FnOnce(&mut MintController) -> R) -> Option<R> {
        self.try_update(f)
    }
}

// main app component
#[component]
pub fn App() -> impl IntoView {
    let config = NetworkConfig::for_network(NetworkType::Mainnet);
    log::info!("Minting on {}", config.network_type.as_str());

    let controller = create_rw_signal(MintController::new(config));
    let wallet = WalletHandle::new(InjectedWallet::new(config));
    if !InjectedWallet::is_installed() {
        log::info!("No injected Ethereum wallet detected");
    }

    // pick up an account the user already authorized on a previous visit
    spawn_local({
        let wallet = wallet.clone();
        async move {
            sync_address(wallet.provider(), &controller).await;
        }
    });

    // follow account switches and disconnects from the extension
    let subscribed = wallet.provider().subscribe_address_changes(Box::new(move |address| {
        controller.update_mint(|c| c.set_address(address));
    }));
    if let Err(e) = subscribed {
        log::info!("Not listening for account changes: {}", e);
    }

    // and network switches, which invalidate the prepared call
    let subscribed = wallet.provider().subscribe_chain_changes(Box::new(move |chain_id| {
        controller.update_mint(|c| c.set_chain_id(Some(chain_id)));
    }));
    if let Err(e) = subscribed {
        log::info!("Not listening for network changes: {}", e);
    }

    view! {
        <main class="container">
            <MintPage controller=controller wallet=wallet />
        </main>
    }
}
