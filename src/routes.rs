use crate::{api::rekap, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::Condition, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        // Config caps the rate at 60000/min
        let requests_per_min = requests_per_min.clamp(1, 60_000);
        let cfg = GovernorConfigBuilder::default()
            .milliseconds_per_request(60_000 / requests_per_min as u64)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst are non-zero");
        Governor::new(&cfg)
    }

    // RATE_UPLOAD_PER_MIN=0 turns limiting off
    let upload_limiter = Condition::new(
        config.rate_upload_per_min > 0,
        build_limiter(config.rate_upload_per_min),
    );

    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/rekap")
                // /rekap
                .service(
                    web::resource("")
                        .wrap(upload_limiter)
                        .route(web::post().to(rekap::upload)),
                )
                // /rekap/{batch}
                .service(web::resource("/{batch}").route(web::get().to(rekap::preview)))
                // /rekap/{batch}/export
                .service(web::resource("/{batch}/export").route(web::get().to(rekap::export))),
        ),
    );
}

// UPLOAD
//  └─ POST /rekap?filename=absen.xlsx   (raw file body)
//       └─ returns batch_id

// PREVIEW / DOWNLOAD
//  ├─ GET /rekap/{batch_id|latest}?q=&page=
//  └─ GET /rekap/{batch_id|latest}/export?format=xlsx|csv
