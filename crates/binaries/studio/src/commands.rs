use crate::guard::CtrlCGuard;
use app_state::AppSettings;
use color_eyre::Result;
use color_eyre::eyre::bail;
use common_types::{Reservation, UserRole};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use studio_client::api::{
    AuthApi, DashboardApi, EventsApi, NotificationsApi, PackagesApi, PaymentsApi, ReservationsApi,
};
use studio_client::checkout::CheckoutForm;
use studio_client::session::require_session;
use studio_client::upload::{AlbumPublisher, LocalFile, StorageClient};
use studio_client::{FileSessionStore, Gateway, SessionStore};
use tracing::{info, warn};

pub struct Studio {
    settings: AppSettings,
    gateway: Gateway,
}

impl Studio {
    pub fn new(settings: AppSettings) -> Result<Self> {
        let session = Arc::new(FileSessionStore::open(&settings.session.path)?);
        let gateway = Gateway::from_settings(&settings.api, &settings.storage)
            .session(session)
            .build()?;
        Ok(Self { settings, gateway })
    }

    fn require_login(&self) -> Result<Option<UserRole>> {
        match require_session(self.gateway.session().as_ref()) {
            Ok(role) => Ok(role),
            Err(e) => bail!("{e}, run `studio login` first"),
        }
    }

    fn require_staff(&self) -> Result<()> {
        match self.require_login()? {
            Some(UserRole::Admin | UserRole::Staff) => Ok(()),
            _ => bail!("This command needs a staff or admin account"),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let response = AuthApi::new(self.gateway.clone())
            .login(email, password)
            .await?;
        match response.user {
            Some(user) => println!("Logged in as {} ({})", user.name, user.role),
            None => println!("Logged in as {email}"),
        }
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        AuthApi::new(self.gateway.clone()).logout().await?;
        println!("Logged out");
        Ok(())
    }

    pub fn status(&self) -> Result<()> {
        let session = self.gateway.session();
        if !session.is_authenticated() {
            println!("Not logged in");
            return Ok(());
        }
        match session.role() {
            Some(role) => println!("Logged in as {role}"),
            None => println!("Logged in"),
        }
        Ok(())
    }

    pub async fn packages(&self, active: bool) -> Result<()> {
        let api = PackagesApi::new(self.gateway.clone());
        let packages = if active { api.active().await? } else { api.list().await? };
        for package in packages {
            println!(
                "{:>5}  {:<30} {:>12.2}{}",
                package.id,
                package.name,
                package.price,
                if package.is_active { "" } else { "  (inactive)" }
            );
        }
        Ok(())
    }

    pub async fn reservations(&self, mine: bool, pending: bool) -> Result<()> {
        let api = ReservationsApi::new(self.gateway.clone());
        let reservations = if mine {
            self.require_login()?;
            api.mine().await?
        } else if pending {
            self.require_staff()?;
            api.pending_approvals().await?
        } else {
            self.require_staff()?;
            api.list().await?
        };
        for reservation in &reservations {
            print_reservation(reservation);
        }
        Ok(())
    }

    pub async fn decide(&self, reservation_id: i64, approve: bool, note: Option<String>) -> Result<()> {
        self.require_staff()?;
        let api = ReservationsApi::new(self.gateway.clone());
        let approval = if approve {
            api.approve(reservation_id, note).await?
        } else {
            api.reject(reservation_id, note).await?
        };
        println!(
            "Reservation {} {:?}",
            approval.reservation_id, approval.decision
        );
        Ok(())
    }

    pub async fn events(&self) -> Result<()> {
        self.require_staff()?;
        for event in EventsApi::new(self.gateway.clone()).list().await? {
            println!(
                "{:>5}  {}  {:<30} {}",
                event.id,
                event.event_date,
                event.name,
                event.location.unwrap_or_default()
            );
        }
        Ok(())
    }

    pub async fn notifications(&self, unread: bool) -> Result<()> {
        self.require_login()?;
        let api = NotificationsApi::new(self.gateway.clone());
        let notifications = if unread { api.unread().await? } else { api.list().await? };
        for notification in notifications {
            println!(
                "{} {}  {}: {}",
                if notification.is_read { ' ' } else { '*' },
                notification.created_at.format("%Y-%m-%d %H:%M"),
                notification.title,
                notification.message
            );
        }
        Ok(())
    }

    pub async fn dashboard(&self) -> Result<()> {
        self.require_staff()?;
        let stats = DashboardApi::new(self.gateway.clone()).stats().await?;
        println!("Reservations:      {}", stats.total_reservations);
        println!("Pending approvals: {}", stats.pending_approvals);
        println!("Upcoming events:   {}", stats.upcoming_events);
        println!("Revenue:           {:.2}", stats.total_revenue);
        Ok(())
    }

    pub async fn publish(&self, event_id: i64, album_name: Option<String>, paths: &[PathBuf]) -> Result<()> {
        self.require_staff()?;
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(LocalFile::from_path(path).await?);
        }

        let storage = StorageClient::new(
            reqwest::Client::new(),
            &self.settings.storage.acl,
            self.settings.upload.chunk_size,
        );
        let mut publisher = AlbumPublisher::builder()
            .gateway(&self.gateway)
            .storage(storage)
            .settings(self.settings.upload.clone())
            .guard(Arc::new(CtrlCGuard::new()))
            .build();

        if let Some(album) = publisher.select_event(event_id).await? {
            info!("Adding to existing album {}", album.name);
        }
        if let Some(name) = album_name {
            publisher.set_album_name(name);
        }
        publisher.add_files(files);

        let mut progress = publisher.progress().subscribe();
        let reporter = tokio::spawn(async move {
            let mut last_reported = 0;
            while progress.changed().await.is_ok() {
                let snapshot = progress.borrow_and_update().clone();
                if snapshot.is_empty() {
                    continue;
                }
                let total: usize = snapshot.values().map(|p| usize::from(*p)).sum();
                let overall = total / snapshot.len();
                if overall >= last_reported + 10 || (overall == 100 && last_reported < 100) {
                    last_reported = overall;
                    info!("Uploading: {overall}%");
                }
            }
        });

        let result = publisher.publish().await;
        reporter.abort();
        let report = result?;
        println!(
            "Published {} images to album {} ({})",
            report.images, report.album.name, report.album.id
        );
        Ok(())
    }

    pub async fn checkout(&self, reservation_id: i64, out: &Path) -> Result<()> {
        self.require_login()?;
        let payment = PaymentsApi::new(self.gateway.clone())
            .hash(reservation_id)
            .await?;
        let customer = match AuthApi::new(self.gateway.clone()).me().await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Checkout continues without customer details: {e}");
                None
            }
        };

        let form = CheckoutForm::new(&self.settings.payment, &payment, customer.as_ref());
        tokio::fs::write(out, form.to_html()).await?;
        println!(
            "Checkout for order {} written to {}, open it in a browser to pay",
            payment.order_id,
            out.display()
        );
        Ok(())
    }
}

fn print_reservation(reservation: &Reservation) {
    let status = format!("{:?}", reservation.status);
    println!(
        "{:>5}  {} {}-{}  {:<10} {}",
        reservation.id,
        reservation.event_date,
        reservation.start_time.format("%H:%M"),
        reservation.end_time.format("%H:%M"),
        status,
        reservation.location
    );
}
