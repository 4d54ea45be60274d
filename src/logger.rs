use std::io::Write;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::peer_connection::RTCPeerConnection;

/// Installs the timestamped logger. Safe to call more than once.
pub fn init() {
    if !enabled() {
        log::set_max_level(log::LevelFilter::Off);
        return;
    }

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,webrtc=warn,webrtc_ice=warn"),
    )
    .format(|buf, record| {
        let now = chrono::Local::now();
        writeln!(
            buf,
            "RUST: [{}] {:<5} {}",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    })
    .try_init();
}

fn enabled() -> bool {
    crate::config::LOGGING_ENABLED && crate::config::dev::ENABLE_LOGGING
}

/// Trickle-ICE candidate as it appears
pub fn dump_candidate(label: &str, cand: &RTCIceCandidate) {
    if let Ok(init) = cand.to_json() {
        log::debug!(
            "Trickle {label}: candidate={} sdp_mid={:?} sdp_mline_index={:?}",
            init.candidate,
            init.sdp_mid,
            init.sdp_mline_index
        );
    }
}

/// getStats snapshot of the nominated pair
pub async fn dump_selected_pair(pc: &RTCPeerConnection, moment: &str) {
    let stats = pc.get_stats().await;
    for (_, v) in stats.reports {
        if let webrtc::stats::StatsReportType::CandidatePair(pair) = v {
            if pair.nominated {
                log::info!(
                    "STATS {moment}: {}:{}  bytes={}/{} state={:?}",
                    pair.local_candidate_id,
                    pair.remote_candidate_id,
                    pair.bytes_sent,
                    pair.bytes_received,
                    pair.state
                );
            }
        }
    }
}
