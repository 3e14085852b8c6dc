use clap::Parser;
use dmgpu::{FRAME_PIXELS, FrameBuffer, HW_MEMORY_SIZE, Lcdc, ObjAttr, OamEntry, Palette, Ppu, SCREEN_H, SCREEN_W, Stat, Tile, TileMapSelect};
use eframe::egui;
use egui::IconData;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(version, about = "Renders Game Boy video memory dumps.", long_about = None)]
struct Args {
    /// 64 KiB memory image to load instead of the demo scene. Registers are
    /// read from 0xFF40-0xFF4B of the image.
    #[arg(name = "DUMP_PATH")]
    dump_path: Option<PathBuf>,

    /// Integer display scale; overrides the saved setting.
    #[arg(long)]
    scale: Option<u8>,
}

#[derive(Clone)]
struct DisplayLogEntry {
    level: log::Level,
    target: String,
    message: String,
}

impl From<dmgpu::log_buffer::LogEntry> for DisplayLogEntry {
    fn from(entry: dmgpu::log_buffer::LogEntry) -> Self {
        Self {
            level: entry.level,
            target: entry.target,
            message: entry.message,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct Config {
    recent_files: Vec<PathBuf>,
    scale: u8,
    palette: [u8; 4],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            scale: 3,
            palette: Palette::GRAYSCALE.colors,
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "dmgpu", "dmgpu")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

fn load_config() -> Config {
    let Some(mut path) = config_dir() else {
        return Config::default();
    };
    path.push("config.toml");
    let Ok(config_str) = fs::read_to_string(&path) else {
        return Config::default();
    };
    toml::from_str(&config_str).unwrap_or_default()
}

fn save_config(config: &Config) -> io::Result<()> {
    if let Some(mut path) = config_dir() {
        fs::create_dir_all(&path)?;
        path.push("config.toml");
        let config_str = toml::to_string(config).map_err(io::Error::other)?;
        fs::write(&path, config_str)?;
    }
    Ok(())
}

fn load_dump(path: &Path) -> io::Result<Ppu> {
    let data = fs::read(path)?;
    let mut ppu = Ppu::new(data).map_err(io::Error::other)?;
    ppu.restore_registers();
    Ok(ppu)
}

/// Checkerboard background, a diagonal-tile window and a row of sprites.
fn demo_scene() -> io::Result<Ppu> {
    let mut ppu = Ppu::new(vec![0u8; HW_MEMORY_SIZE]).map_err(io::Error::other)?;

    let checker = Tile { data: std::array::from_fn(|r| if r < 4 { [0xF0, 0x0F] } else { [0x0F, 0xF0] }) };
    let diagonal = Tile { data: std::array::from_fn(|r| [0x80 >> r, 0x80 >> r]) };
    let solid = Tile { data: [[0xFF, 0x00]; 8] };
    let mem = ppu.mem_mut();
    mem.write_tile(0, &checker);
    mem.write_tile(1, &diagonal);
    mem.write_tile(2, &solid);
    mem.tile_map_mut(TileMapSelect::Map0).fill(0);
    mem.tile_map_mut(TileMapSelect::Map1).fill(1);

    let mut objs = [OamEntry::default(); dmgpu::mem::OBJ_COUNT];
    for (i, obj) in objs.iter_mut().take(8).enumerate() {
        let i = i as u8;
        *obj = OamEntry {
            y: 16 + 60,
            x: 8 + 16 + i * 16,
            tile: 2,
            attr: if i % 2 == 0 { ObjAttr::empty() } else { ObjAttr::PALETTE },
        };
    }
    ppu.transfer_oam(&objs);

    let io = ppu.io_mut();
    io.lcdc = Lcdc::LCD_ENABLE | Lcdc::BG_ENABLE | Lcdc::WND_MAP_SELECT;
    io.bgp = 0xE4;
    io.obp0 = 0xE4;
    io.obp1 = 0x1B;
    io.wx = 7 + 96;
    io.wy = 80;
    Ok(ppu)
}

enum Source {
    Demo,
    Dump(PathBuf),
}

struct ViewerApp {
    ppu: Ppu,
    source: Source,
    frame: Box<FrameBuffer>,
    rgba: Vec<u8>,
    stat_irqs: Rc<Cell<u32>>,
    config: Config,
    texture: Option<egui::TextureHandle>,
    status: Option<String>,
    show_debug_panel: bool,
    log_entries: Vec<DisplayLogEntry>,
    auto_scroll_logs: bool,
    log_filter: LogFilter,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LogFilter {
    All,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl ViewerApp {
    fn new(args: Args) -> io::Result<Self> {
        let mut config = load_config();
        if let Some(scale) = args.scale {
            config.scale = scale.max(1);
        }

        let mut app = Self {
            ppu: demo_scene()?,
            source: Source::Demo,
            frame: Box::new([0u8; FRAME_PIXELS]),
            rgba: vec![0u8; FRAME_PIXELS * 4],
            stat_irqs: Rc::new(Cell::new(0)),
            config,
            texture: None,
            status: None,
            show_debug_panel: cfg!(debug_assertions),
            log_entries: Vec::new(),
            auto_scroll_logs: true,
            log_filter: LogFilter::All,
        };
        app.install_stat_counter();
        if let Some(path) = args.dump_path {
            app.open_path(path);
        }
        Ok(app)
    }

    fn install_stat_counter(&mut self) {
        let counter = Rc::clone(&self.stat_irqs);
        self.ppu.set_stat_interrupt(Some(Box::new(move || counter.set(counter.get().wrapping_add(1)))));
    }

    // Most recent first, at most ten entries.
    fn add_to_recent(recent: &mut Vec<PathBuf>, path: PathBuf) {
        if let Some(index) = recent.iter().position(|p| p == &path) {
            recent.remove(index);
        }
        recent.insert(0, path);
        recent.truncate(10);
    }

    fn open_path(&mut self, path: PathBuf) {
        match load_dump(&path) {
            Ok(ppu) => {
                log::info!("loaded {}", path.display());
                self.ppu = ppu;
                self.stat_irqs.set(0);
                self.install_stat_counter();
                Self::add_to_recent(&mut self.config.recent_files, path.clone());
                self.source = Source::Dump(path);
                self.status = None;
            }
            Err(e) => {
                log::error!("cannot load {}: {e}", path.display());
                self.status = Some(format!("Cannot load {}: {e}", path.display()));
            }
        }
    }

    fn open_dump(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Open memory dump")
            .add_filter("Memory dump", &["bin", "dmp", "sav"])
            .pick_file()
        {
            self.open_path(path);
        }
    }

    fn load_demo(&mut self) {
        match demo_scene() {
            Ok(ppu) => self.ppu = ppu,
            Err(e) => {
                log::error!("cannot build demo scene: {e}");
                return;
            }
        }
        self.stat_irqs.set(0);
        self.install_stat_counter();
        self.source = Source::Demo;
        self.status = None;
    }

    fn save_snapshot(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save memory snapshot")
            .set_file_name("snapshot.bin")
            .save_file()
        else {
            return;
        };
        match fs::write(&path, self.ppu.snapshot()) {
            Ok(()) => log::info!("snapshot written to {}", path.display()),
            Err(e) => {
                log::error!("cannot write {}: {e}", path.display());
                self.status = Some(format!("Cannot write {}: {e}", path.display()));
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let io = self.ppu.io_mut();
        ctx.input(|i| {
            if i.key_down(egui::Key::ArrowLeft) {
                io.scx = io.scx.wrapping_sub(1);
            }
            if i.key_down(egui::Key::ArrowRight) {
                io.scx = io.scx.wrapping_add(1);
            }
            if i.key_down(egui::Key::ArrowUp) {
                io.scy = io.scy.wrapping_sub(1);
            }
            if i.key_down(egui::Key::ArrowDown) {
                io.scy = io.scy.wrapping_add(1);
            }
            if i.key_pressed(egui::Key::Num1) {
                io.lcdc_reset(Lcdc::BG_MAP_SELECT);
            }
            if i.key_pressed(egui::Key::Num2) {
                io.lcdc_set(Lcdc::BG_MAP_SELECT);
            }
            if i.key_pressed(egui::Key::Enter) {
                io.lcdc.toggle(Lcdc::BG_ENABLE);
            }
            if i.key_pressed(egui::Key::W) {
                io.lcdc.toggle(Lcdc::WND_ENABLE);
            }
            if i.key_pressed(egui::Key::S) {
                io.lcdc.toggle(Lcdc::OBJ_ENABLE);
            }
        });
    }

    fn render_frame(&mut self) {
        let palette = Palette::new(self.config.palette);
        self.ppu.render(&mut self.frame, &palette);
        dmgpu::video::framebuffer_gray_to_rgba(&mut self.rgba, &self.frame[..]);
    }

    fn poll_logs(&mut self) {
        let new_logs = dmgpu::log_buffer::drain_logs();
        for entry in new_logs {
            self.log_entries.push(entry.into());
        }
        const MAX_LOG_ENTRIES: usize = 2000;
        if self.log_entries.len() > MAX_LOG_ENTRIES {
            let excess = self.log_entries.len() - MAX_LOG_ENTRIES;
            self.log_entries.drain(0..excess);
        }
    }

    fn level_color(level: log::Level) -> egui::Color32 {
        match level {
            log::Level::Error => egui::Color32::from_rgb(255, 100, 100),
            log::Level::Warn => egui::Color32::from_rgb(255, 200, 100),
            log::Level::Info => egui::Color32::from_rgb(100, 200, 255),
            log::Level::Debug => egui::Color32::from_rgb(180, 180, 180),
            log::Level::Trace => egui::Color32::from_rgb(120, 120, 120),
        }
    }

    fn filter_matches(&self, level: log::Level) -> bool {
        match self.log_filter {
            LogFilter::All => true,
            LogFilter::Error => level == log::Level::Error,
            LogFilter::Warn => level <= log::Level::Warn,
            LogFilter::Info => level <= log::Level::Info,
            LogFilter::Debug => level <= log::Level::Debug,
            LogFilter::Trace => true,
        }
    }

    fn register_grid(&mut self, ui: &mut egui::Ui) {
        let io = self.ppu.io();
        egui::Grid::new("registers").num_columns(2).striped(true).show(ui, |ui| {
            let rows = [
                ("LCDC", io.lcdc.bits()),
                ("STAT", io.stat().bits()),
                ("SCY", io.scy),
                ("SCX", io.scx),
                ("LY", io.ly()),
                ("LYC", io.lyc),
                ("BGP", io.bgp),
                ("OBP0", io.obp0),
                ("OBP1", io.obp1),
                ("WY", io.wy),
                ("WX", io.wx),
            ];
            for (name, value) in rows {
                ui.monospace(name);
                ui.monospace(format!("{value:#04X}"));
                ui.end_row();
            }
        });
        ui.label(format!("Mode: {:?}", io.mode()));
        ui.label(format!("STAT interrupts: {}", self.stat_irqs.get()));

        ui.separator();
        let io = self.ppu.io_mut();
        let mut lcdc = io.lcdc;
        for (name, flag) in [
            ("LCD on", Lcdc::LCD_ENABLE),
            ("Background", Lcdc::BG_ENABLE),
            ("Window", Lcdc::WND_ENABLE),
            ("Sprites", Lcdc::OBJ_ENABLE),
            ("8x16 sprites", Lcdc::OBJ_SIZE_SELECT),
            ("Alternate tile bank", Lcdc::BG_DATA_SELECT),
        ] {
            let mut on = lcdc.contains(flag);
            if ui.checkbox(&mut on, name).changed() {
                lcdc.set(flag, on);
            }
        }
        io.lcdc = lcdc;

        let mut stat = io.stat();
        for (name, flag) in [
            ("HBlank IRQ", Stat::HBLANK_INT),
            ("VBlank IRQ", Stat::VBLANK_INT),
            ("OAM IRQ", Stat::OAM_INT),
            ("LYC IRQ", Stat::LYC_INT),
        ] {
            let mut on = stat.contains(flag);
            if ui.checkbox(&mut on, name).changed() {
                stat.set(flag, on);
                if on { io.stat_set(flag) } else { io.stat_reset(flag) }
            }
        }
        ui.add(egui::Slider::new(&mut io.lyc, 0..=153).text("LYC"));
    }

    fn log_view(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Filter:");
            ui.selectable_value(&mut self.log_filter, LogFilter::All, "All");
            ui.selectable_value(&mut self.log_filter, LogFilter::Error, "Error");
            ui.selectable_value(&mut self.log_filter, LogFilter::Warn, "Warn");
            ui.selectable_value(&mut self.log_filter, LogFilter::Info, "Info");
            ui.selectable_value(&mut self.log_filter, LogFilter::Debug, "Debug");
            ui.selectable_value(&mut self.log_filter, LogFilter::Trace, "Trace");
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut self.auto_scroll_logs, "Auto-scroll");
            if ui.button("Clear").clicked() {
                self.log_entries.clear();
                dmgpu::log_buffer::clear_logs();
            }
            let dropped = dmgpu::log_buffer::dropped_logs();
            if dropped > 0 {
                ui.colored_label(egui::Color32::GRAY, format!("{dropped} dropped"));
            }
        });
        ui.separator();

        let text_style = egui::TextStyle::Monospace;
        let row_height = ui.text_style_height(&text_style);
        let filtered: Vec<_> = self
            .log_entries
            .iter()
            .filter(|e| self.filter_matches(e.level))
            .collect();

        egui::ScrollArea::vertical()
            .auto_shrink([true, false])
            .stick_to_bottom(self.auto_scroll_logs)
            .show_rows(ui, row_height, filtered.len(), |ui, row_range| {
                for i in row_range {
                    if let Some(entry) = filtered.get(i) {
                        let color = Self::level_color(entry.level);
                        let short_target = entry.target.split("::").last().unwrap_or(&entry.target);
                        ui.horizontal(|ui| {
                            ui.colored_label(color, format!("[{:5}]", entry.level));
                            ui.colored_label(egui::Color32::GRAY, format!("{:>8}", short_target));
                            ui.label(&entry.message);
                        });
                    }
                }
            });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_logs();
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open dump...").clicked() {
                        self.open_dump();
                        ui.close_menu();
                    }
                    if ui.button("Demo scene").clicked() {
                        self.load_demo();
                        ui.close_menu();
                    }
                    if ui.button("Save snapshot...").clicked() {
                        self.save_snapshot();
                        ui.close_menu();
                    }
                    let recent = self.config.recent_files.clone();
                    if !recent.is_empty() {
                        ui.separator();
                        for file in recent {
                            if ui.button(file.display().to_string()).clicked() {
                                self.open_path(file);
                                ui.close_menu();
                            }
                        }
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    ui.add(egui::Slider::new(&mut self.config.scale, 1..=8).text("Scale"));
                    if ui.checkbox(&mut self.show_debug_panel, "Debug Panel").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });

        if self.show_debug_panel {
            egui::SidePanel::right("debug_panel")
                .resizable(true)
                .min_width(250.0)
                .default_width(350.0)
                .max_width(500.0)
                .show(ctx, |ui| {
                    ui.heading("Registers");
                    ui.separator();
                    self.register_grid(ui);
                    ui.separator();
                    ui.heading("Log");
                    self.log_view(ui);
                });
        }

        self.render_frame();

        egui::CentralPanel::default().show(ctx, |ui| {
            match &self.source {
                Source::Demo => ui.label("Demo scene"),
                Source::Dump(path) => ui.label(format!("Dump: {}", path.display())),
            };
            if let Some(status) = &self.status {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), status);
            }
            ui.label("Arrows scroll, 1/2 pick the map, Enter/W/S toggle background, window and sprites.");
            ui.separator();

            let image = egui::ColorImage::from_rgba_unmultiplied([SCREEN_W, SCREEN_H], &self.rgba);
            let tex = self.texture.get_or_insert_with(|| {
                ui.ctx().load_texture("framebuffer", image.clone(), egui::TextureOptions::NEAREST)
            });
            tex.set(image, egui::TextureOptions::NEAREST);

            let scale = self.config.scale.max(1) as f32;
            let desired = egui::Vec2::new(SCREEN_W as f32 * scale, SCREEN_H as f32 * scale);
            ui.image((tex.id(), desired));
        });

        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = save_config(&self.config) {
            eprintln!("Failed to save config: {}", e);
        }
    }
}

fn main() -> eframe::Result<()> {
    let log_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = dmgpu::log_buffer::init_logger(log_level);
    log::info!("dmgpu {}", dmgpu::VERSION);

    let args = Args::parse();
    let icon = IconData::default();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("dmgpu viewer")
            .with_app_id("com.dmgpu.viewer")
            .with_icon(icon),
        ..Default::default()
    };

    eframe::run_native(
        "dmgpu",
        native_options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(args)?))),
    )
}
