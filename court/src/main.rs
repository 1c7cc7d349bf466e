mod aim;
mod court;

use anyhow::Context;
use trajectory::{
    BodyDef, CollisionOutcome, DEFAULT_FIXED_DT, LineColour, PathRenderer, Point, Pose,
    Projectile, ProjectileId, Trajectory, TrajectorySettings, Vec3,
};

use crate::aim::Aim;

/// Frames spent aiming each ball before switching to the next one.
const FRAMES_PER_BALL: u32 = 90;

/// Line renderer that logs what it would draw.
#[derive(Default)]
struct LogLine {
    points: usize,
    colour: Option<LineColour>,
}

impl PathRenderer for LogLine {
    fn set_path(&mut self, path: &[Point]) {
        self.points = path.len();
        if let Some(end) = path.last() {
            log::debug!("line: {} points, ends at {:.2?}", path.len(), end);
        }
    }

    fn clear(&mut self) {
        self.points = 0;
        log::debug!("line cleared");
    }

    fn set_colour(&mut self, colour: LineColour) {
        self.colour = Some(colour);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = court::build();
    let settings = TrajectorySettings::default().with_max_steps(150);
    let mut trajectory = Trajectory::new(&scene, LogLine::default(), settings)
        .context("building the shadow world")?;

    let balls: Vec<Projectile> = (1..=2)
        .map(|id| {
            Projectile::at_rest(
                ProjectileId(id),
                Pose::from_translation(Vec3::new(0.0, 1.4, 0.0)),
                BodyDef::basketball(),
            )
        })
        .collect();

    let mut aim = Aim {
        player_position: Vec3::new(0.0, 0.0, court::SHOOTER_Z),
        player_velocity: Vec3::zeros(),
        yaw: 0.0,
        pitch: 0.55,
        shoot_force: 5.4,
    };

    let mut hits = 0;
    let mut frame = 0u32;
    for ball in &balls {
        for _ in 0..FRAMES_PER_BALL {
            let t = frame as f32 * DEFAULT_FIXED_DT;
            frame += 1;

            // Live scene moves first, then the mirror catches up, then we predict.
            scene.set_pose(court::DEFENDER, court::defender_pose(t));
            trajectory.sync_obstacles(&scene);

            aim.pitch = 0.45 + 0.25 * (t * 1.3).sin();
            let hand = aim.hand();
            let mut held = ball.clone();
            held.pose = hand;

            let prediction = trajectory
                .simulate(&held, hand.translation, aim.launch_velocity(), hand.rotation)
                .with_context(|| format!("predicting frame {frame}"))?;

            if prediction.outcome == CollisionOutcome::Hit {
                hits += 1;
            }
            if let Some(contact) = prediction.contact {
                log::debug!(
                    "frame {frame}: {:?} on {:?} at step {}",
                    prediction.outcome,
                    contact.tag,
                    contact.step
                );
            }
        }
        log::info!("{:?}: aimed for {FRAMES_PER_BALL} frames", ball.id);
    }

    trajectory.cancel();
    log::info!(
        "{hits} of {frame} aiming frames predicted a basket; line shows {} points, colour {:?}",
        trajectory.renderer().points,
        trajectory.renderer().colour
    );
    Ok(())
}
