use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use strata::{
    DrawCommand, DriverOpts, Drawable, Fps, FrameDriver, Node, NodeId, NodeMut, NodeRef,
    PointerEvent, Recorder, RecordingBackend, Rgba8, Scene, TickPolicy, TransformProvider,
    Vector2, View,
};

type Demo = RecordingBackend;

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    /// Log engine events (debug level) to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a built-in demo scene headless and report what was drawn.
    Demo(DemoArgs),
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Scene to build.
    #[arg(long, value_enum, default_value_t = SceneChoice::Simple)]
    scene: SceneChoice,

    /// Frames to run after the initial one.
    #[arg(long, default_value_t = 10)]
    frames: u64,

    /// Frame rate; defaults to the scene's own rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Pace frames in real time with the frame driver instead of running them back to back.
    #[arg(long)]
    realtime: bool,

    /// Pointer click at `X,Y`, delivered after the initial frame.
    #[arg(long, value_parser = parse_point)]
    click: Option<Vector2>,

    /// Write the last frame's draw commands as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneChoice {
    /// A rotating parent carrying a square.
    Simple,
    /// A rotating station with six fighters, plus two free fighters.
    Ships,
}

impl SceneChoice {
    fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Ships => "ships",
        }
    }

    fn default_fps(self) -> u32 {
        match self {
            Self::Simple => 50,
            Self::Ships => 20,
        }
    }
}

fn parse_point(s: &str) -> Result<Vector2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Vector2::new(x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Demo(args) => cmd_demo(args),
    }
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let fps = Fps::new(args.fps.unwrap_or(args.scene.default_fps()), 1)?;
    let mut scene = Scene::<Demo>::new();
    let mut view = View::builder(Recorder::new())
        .fps(fps)
        .click_handling(matches!(args.scene, SceneChoice::Ships))
        .before_draw(Recorder::clear)
        .build(&mut scene);

    let roots = match args.scene {
        SceneChoice::Simple => build_simple(&mut scene)?,
        SceneChoice::Ships => build_ships(&mut scene)?,
    };
    view.attach_root(&mut scene, &roots)
        .context("attach demo roots")?;
    view.run_frame(&mut scene);

    let mut outcome = None;
    if let Some(point) = args.click {
        if view.opts().click_handling {
            outcome = Some(view.dispatch_pointer(&mut scene, point, &PointerEvent::default())?);
        } else {
            eprintln!("scene '{}' has no click targets; ignoring --click", args.scene.name());
        }
    }

    if args.realtime {
        let mut driver = FrameDriver::new(DriverOpts {
            fps,
            policy: TickPolicy::Skip,
        })?;
        driver.run(&mut view, &mut scene, Some(args.frames));
    } else {
        for _ in 0..args.frames {
            view.run_frame(&mut scene);
        }
    }

    let frames = view.frames_run();
    let nodes = scene.len();
    let recorder = view.dispose(&mut scene);

    println!(
        "scene={} frames={} nodes={} commands={}",
        args.scene.name(),
        frames,
        nodes,
        recorder.commands().len()
    );
    if let Some(outcome) = outcome {
        println!(
            "click_over={} click={}",
            outcome.click_over.is_some(),
            outcome.click.is_some()
        );
    }

    if let Some(out) = args.out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let json = recorder.to_json()?;
        std::fs::write(&out, json).with_context(|| format!("write '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

const RED: Rgba8 = [255, 0, 0, 255];
const GREEN: Rgba8 = [0, 255, 0, 255];
const WEAPON_GREEN: Rgba8 = [0, 128, 0, 255];
const FIGHTER_BLUE: Rgba8 = [20, 126, 158, 255];

fn complement(c: Rgba8) -> Rgba8 {
    [255 - c[0], 255 - c[1], 255 - c[2], c[3]]
}

fn rect(ctx: &mut Recorder, color: Rgba8, size: f64, center: Vector2, rotation_deg: f64) {
    ctx.push(DrawCommand::FillRect {
        center,
        width: size,
        height: size,
        rotation_deg,
        color,
    });
}

// simple

struct Square {
    size: f64,
}

impl Drawable<Demo> for Square {
    fn draw(&self, ctx: &mut Recorder, node: NodeRef<'_, Demo>) {
        let half = self.size / 2.0;
        let center = node.absolute_position().add(Vector2::new(half, half));
        rect(ctx, RED, self.size, center, node.absolute_rotation());
    }
}

struct Rotator {
    degrees_per_frame: f64,
}

impl Drawable<Demo> for Rotator {
    fn update(&mut self, mut node: NodeMut<'_, Demo>) {
        node.rotate(self.degrees_per_frame);
    }
}

fn build_simple(scene: &mut Scene<Demo>) -> anyhow::Result<Vec<NodeId>> {
    let parent = scene.spawn(
        Rotator {
            degrees_per_frame: 1.0,
        },
        (100.0, 100.0),
    );
    let square = scene.spawn(Square { size: 20.0 }, (20.0, 20.0));
    scene.add_child(parent, square)?;
    Ok(vec![parent])
}

// ships

/// Curved hull segment; its ends anchor weapons.
struct Line {
    width: f64,
    len: f64,
    color: Rgba8,
}

impl Line {
    // Offset of (x, y) turned by -rot degrees, scaled to the larger coordinate.
    fn point_angle(x: f64, y: f64, rot: f64) -> Vector2 {
        let len = x.abs().max(y.abs());
        let angle = y.atan2(x) - rot.to_radians();
        Vector2::new(angle.cos() * len, angle.sin() * len)
    }

    fn end(&self, node: &NodeRef<'_, Demo>) -> Vector2 {
        node.absolute_position()
            .add(Self::point_angle(self.len, 0.0, -node.absolute_rotation()))
    }

    fn start(&self, node: &NodeRef<'_, Demo>) -> Vector2 {
        node.absolute_position()
            .add(Self::point_angle(-self.len, 0.0, -node.absolute_rotation()))
    }
}

impl Drawable<Demo> for Line {
    fn draw(&self, ctx: &mut Recorder, node: NodeRef<'_, Demo>) {
        let p = node.absolute_position();
        let rot = -node.absolute_rotation();
        let bend = 2.5 * self.width;
        ctx.push(DrawCommand::Bezier {
            start: self.start(&node),
            c1: p.add(Self::point_angle(-bend / 2.0, bend, rot)),
            c2: p.add(Self::point_angle(bend / 2.0, bend, rot)),
            end: self.end(&node),
            width: self.width,
            color: self.color,
        });
    }
}

/// Fires at the first target in range, then cools down. Timing is in frames.
struct Weapon {
    duration: u64,
    cooldown: u64,
    range: f64,
    size: f64,
    color: Rgba8,
    targets: Vec<Vector2>,
    firing_at: Option<Vector2>,
    since_fired: u64,
}

impl Weapon {
    fn new(duration: u64, cooldown: u64, range: f64, size: f64, color: Rgba8) -> Self {
        Self {
            duration,
            cooldown,
            range,
            size,
            color,
            targets: Vec::new(),
            firing_at: None,
            // ready to fire on the first update
            since_fired: cooldown.saturating_add(1),
        }
    }
}

impl Drawable<Demo> for Weapon {
    fn update(&mut self, node: NodeMut<'_, Demo>) {
        self.since_fired = self.since_fired.saturating_add(1);
        if self.firing_at.is_some() {
            if self.since_fired > self.duration {
                self.firing_at = None;
            }
            return;
        }
        if self.since_fired <= self.cooldown {
            return;
        }
        let p = node.absolute_position();
        if let Some(target) = self.targets.iter().find(|t| p.distance(**t) < self.range) {
            self.firing_at = Some(*target);
            self.since_fired = 0;
        }
    }

    fn draw(&self, ctx: &mut Recorder, node: NodeRef<'_, Demo>) {
        let p = node.absolute_position();
        rect(ctx, WEAPON_GREEN, 4.0, p, node.absolute_rotation());
        if let Some(target) = self.firing_at
            && self.duration > 0
        {
            let left = self.duration.saturating_sub(self.since_fired) as f64;
            ctx.push(DrawCommand::StrokeLine {
                from: p,
                to: target,
                width: self.size * (left / self.duration as f64),
                color: self.color,
            });
        }
    }
}

struct Fighter {
    targets: Vec<Vector2>,
}

impl Drawable<Demo> for Fighter {
    fn draw(&self, ctx: &mut Recorder, _node: NodeRef<'_, Demo>) {
        for target in &self.targets {
            rect(ctx, RED, 4.0, *target, 0.0);
        }
    }
}

struct Station {
    targets: Vec<Vector2>,
    radius: f64,
    selected: bool,
}

impl Drawable<Demo> for Station {
    fn draw(&self, ctx: &mut Recorder, node: NodeRef<'_, Demo>) {
        for target in &self.targets {
            rect(ctx, RED, 4.0, *target, 0.0);
        }
        let p = node.absolute_position();
        if self.selected {
            ctx.push(DrawCommand::StrokeCircle {
                center: p,
                radius: self.radius,
                color: GREEN,
            });
        }
        rect(ctx, RED, 4.0, p, node.absolute_rotation());
    }

    fn update(&mut self, mut node: NodeMut<'_, Demo>) {
        node.rotate(-2.0);
    }

    fn intersects(&self, node: NodeRef<'_, Demo>, point: Vector2) -> bool {
        node.absolute_position().distance(point) < self.radius
    }
}

fn spawn_fighter(
    scene: &mut Scene<Demo>,
    position: Vector2,
    rotation: f64,
    size: f64,
    color: Rgba8,
) -> anyhow::Result<NodeId> {
    let fighter = scene.insert(
        Node::new(Fighter {
            targets: Vec::new(),
        })
        .at(position)
        .rotated(rotation),
    );

    let colors = [color, complement(color), complement(color)];
    let mut lines = Vec::with_capacity(colors.len());
    for (n, color) in colors.into_iter().enumerate() {
        let line = scene.spawn(
            Line {
                width: size,
                len: size * 5.0,
                color,
            },
            (0.0, -size * 5.0),
        );
        scene
            .node_mut(line)?
            .rotate_around_point(Vector2::ZERO, n as f64 * 120.0);
        scene.add_child(fighter, line)?;
        lines.push(line);
    }

    let mounts = [(lines[1], true), (lines[2], false)];
    let weapon_colors = [[200, 160, 40, 255], [204, 0, 0, 255]];
    for ((line, at_end), color) in mounts.into_iter().zip(weapon_colors) {
        let anchor = {
            let node = scene.node(line)?;
            let hull = node
                .behavior::<Line>()
                .context("hull segment lost its behavior")?;
            if at_end {
                hull.end(&node)
            } else {
                hull.start(&node)
            }
        };
        let weapon = scene.spawn(Weapon::new(10, 40, 210.0, size, color), (20.0, 20.0));
        scene.add_child(fighter, weapon)?;
        scene.node_mut(weapon)?.set_absolute_position(anchor);
    }
    Ok(fighter)
}

fn spawn_station(scene: &mut Scene<Demo>, position: Vector2, size: f64) -> anyhow::Result<NodeId> {
    let station = scene.spawn(
        Station {
            targets: Vec::new(),
            radius: 0.0,
            selected: false,
        },
        position,
    );
    let distance = size * 14.0;
    let mut first_weapon = None;
    for n in 0..6 {
        let fighter = spawn_fighter(scene, Vector2::new(0.0, distance), 0.0, size, FIGHTER_BLUE)?;
        scene
            .node_mut(fighter)?
            .rotate_around_point(Vector2::ZERO, 30.0 + f64::from(n) * 60.0);
        scene.add_child(station, fighter)?;
        if first_weapon.is_none() {
            first_weapon = scene
                .subtree(fighter)
                .into_iter()
                .find(|id| scene.behavior::<Weapon>(*id).is_some());
        }
    }

    let weapon = first_weapon.context("station fighters carry no weapons")?;
    let radius = scene
        .node(weapon)?
        .absolute_position()
        .distance(scene.node(station)?.absolute_position());
    if let Some(s) = scene.behavior_mut::<Station>(station) {
        s.radius = radius;
    }
    Ok(station)
}

/// Hand `target` to every ship part under `root`.
fn add_target(scene: &mut Scene<Demo>, root: NodeId, target: Vector2) {
    for id in scene.subtree(root) {
        if let Some(w) = scene.behavior_mut::<Weapon>(id) {
            w.targets.push(target);
        } else if let Some(f) = scene.behavior_mut::<Fighter>(id) {
            f.targets.push(target);
        } else if let Some(s) = scene.behavior_mut::<Station>(id) {
            s.targets.push(target);
        }
    }
}

fn build_ships(scene: &mut Scene<Demo>) -> anyhow::Result<Vec<NodeId>> {
    let targets = [
        Vector2::new(200.0, 200.0),
        Vector2::new(600.0, 600.0),
        Vector2::new(600.0, 200.0),
    ];

    let station = spawn_station(scene, Vector2::new(400.0, 400.0), 4.0)?;
    scene.on_click(station, |scene, node, _, _| {
        if let Some(s) = scene.behavior_mut::<Station>(node) {
            s.selected = !s.selected;
            tracing::debug!(selected = s.selected, "station toggled");
        }
    })?;
    for target in targets {
        add_target(scene, station, target);
    }

    let f1 = spawn_fighter(scene, Vector2::new(50.0, 50.0), 0.0, 4.0, [255, 110, 110, 255])?;
    for target in targets {
        add_target(scene, f1, target);
    }
    let f2 = spawn_fighter(scene, Vector2::new(100.0, 100.0), 0.0, 4.0, [110, 255, 110, 255])?;
    scene.node_mut(f2)?.set_absolute_stack(-1.0);

    Ok(vec![station, f1, f2])
}
