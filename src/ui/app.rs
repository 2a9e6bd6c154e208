//! Main application for the Grid Duel GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel};
use strum::IntoEnumIterator;

use crate::board::PlayerId;
use crate::config::{GameConfig, Variant};
use crate::rules::{Direction, MoveModel, TerminalStatus};
use crate::session::HumanMove;

use super::board_view::{BoardScene, BoardView};
use super::game_state::GameState;
use super::theme::*;

/// Main Grid Duel application
pub struct GridDuelApp {
    state: GameState,
    /// Settings for games started from the menu
    config: GameConfig,
    board_view: BoardView,
    show_debug: bool,
}

impl GridDuelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, state: GameState) -> Self {
        Self {
            config: state.session.config().clone(),
            state,
            board_view: BoardView::default(),
            show_debug: true,
        }
    }

    /// Replace the running game with a new variant on its default board
    fn new_game(&mut self, variant: Variant) {
        let mut config = GameConfig::for_variant(variant);
        config.seed = self.config.seed;
        config.obstacle_fraction = self.config.obstacle_fraction;
        match GameState::new(config.clone()) {
            Ok(state) => {
                self.state = state;
                self.config = config;
            }
            Err(err) => self.state.message = Some(err.to_string()),
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    for variant in Variant::iter() {
                        if ui.button(format!("New {variant} game")).clicked() {
                            self.new_game(variant);
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button("Restart (N)").clicked() {
                        self.state.reset();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Search Panel (F1)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let config = self.state.session.config();
                    ui.label(format!("{} - {}x{}", config.variant, config.rows, config.cols));
                });
            });
        });
    }

    /// Render the side panel with game info and search stats
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.render_title_card(ui);
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_scores_card(ui);
                ui.add_space(10.0);

                self.render_legend_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if self.state.session.is_over() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui);
                }

                if let Some(msg) = &self.state.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        let players = self.state.session.players();
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new(format!(
                "{}{}",
                players[PlayerId::Human].glyph,
                players[PlayerId::Computer].glyph
            )).size(20.0));
            ui.add_space(4.0);
            ui.label(RichText::new("GRID DUEL").size(22.0).strong().color(TEXT_PRIMARY));
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        let session = &self.state.session;
        let mover = &session.players()[session.side_to_move()];
        Self::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(mover.glyph).size(32.0));
                ui.add_space(12.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(mover.name).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.state.is_ai_thinking() {
                        let secs = self
                            .state
                            .ai_thinking_elapsed()
                            .map_or(0.0, |d| d.as_secs_f32());
                        let color = match secs {
                            s if s < 1.0 => TIMER_NORMAL,
                            s if s < 5.0 => TIMER_WARNING,
                            _ => TIMER_CRITICAL,
                        };
                        (format!("thinking... {secs:.1}s"), color)
                    } else if session.is_over() {
                        ("Game Over".to_string(), WIN_HIGHLIGHT)
                    } else {
                        let hint = match session.rules().model() {
                            MoveModel::FreePlacement => "click a cell",
                            MoveModel::DirectionalStep => "click a neighbour or use W/A/S/D",
                        };
                        (format!("Your turn: {hint}"), TIMER_NORMAL)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
            ui.add_space(4.0);
            ui.label(
                RichText::new(format!(
                    "Move #{}  ({:.1}s)",
                    session.history().len(),
                    self.state.move_timer.elapsed().as_secs_f32()
                ))
                .size(11.0)
                .color(TEXT_SECONDARY),
            );
        });
    }

    fn render_scores_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("SCORES").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            for player in self.state.session.players().iter() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(player.glyph).size(18.0));
                    ui.label(RichText::new(player.name).size(13.0).color(TEXT_PRIMARY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(player.score.to_string())
                                .size(16.0)
                                .strong()
                                .color(TEXT_PRIMARY),
                        );
                    });
                });
            }
        });
    }

    fn render_legend_card(&self, ui: &mut egui::Ui) {
        let tiles = self.state.session.tiles();
        if tiles.legend().next().is_none() {
            return;
        }
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TILES").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            for spec in tiles.legend() {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(spec.glyph).size(16.0));
                    ui.label(RichText::new(spec.name).size(12.0).color(TEXT_SECONDARY));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let points = format!("{} pts", spec.points);
                        ui.label(RichText::new(points).size(12.0).color(TEXT_SECONDARY));
                    });
                });
            }
        });
    }

    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("SEARCH").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = &self.state.last_ai_result else {
                ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                return;
            };
            ui.label(
                RichText::new(format!("Value: {}", result.value))
                    .size(11.0)
                    .strong()
                    .color(TIMER_NORMAL),
            );
            ui.label(
                RichText::new(format!(
                    "{} nodes, {} cutoffs, {}ms",
                    result.nodes, result.stats.cutoffs, result.time_ms
                ))
                .size(10.0)
                .color(TEXT_SECONDARY),
            );
            ui.label(
                RichText::new(format!(
                    "{} leaves, depth {}",
                    result.stats.leaves, result.stats.max_ply
                ))
                .size(10.0)
                .color(TEXT_MUTED),
            );
            if let Some(waited) = self.state.move_timer.ai_thinking_time {
                ui.label(
                    RichText::new(format!("Turn took {:.2}s", waited.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_MUTED),
                );
            }
            if let Some(pos) = result.best_move {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("-> row {}, col {}", pos.row + 1, pos.col + 1))
                        .size(12.0)
                        .strong()
                        .color(WIN_HIGHLIGHT),
                );
            }
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui) {
        let Some(outcome) = self.state.session.outcome() else {
            return;
        };
        let players = self.state.session.players();
        let headline = match outcome.status {
            TerminalStatus::Won(id) => format!("{} {} WINS!", players[id].glyph, players[id].name),
            _ => "It's a tie!".to_string(),
        };
        let [human, computer] = outcome.scores;

        let mut restart = false;
        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let banner = egui::Color32::from_rgb(180, 255, 180);
                    ui.label(RichText::new("GAME OVER").size(12.0).color(banner));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    let scores = format!("{human} - {computer}");
                    ui.label(RichText::new(scores).size(14.0).color(WIN_HIGHLIGHT));
                    ui.add_space(12.0);
                    restart = ui.button(RichText::new("New Game").size(14.0).strong()).clicked();
                });
            });
        if restart {
            self.state.reset();
        }
    }

    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            let winning_line = self.state.winning_line();
            let session = &self.state.session;
            let scene = BoardScene {
                board: session.board(),
                players: session.players(),
                tiles: session.tiles(),
                last_move: session.last_move().map(|(_, pos)| pos),
                winning_line: winning_line.as_deref(),
            };

            let state = &self.state;
            let clicked = self.board_view.show(ui, &scene, |pos| state.is_playable(pos));

            if let Some(pos) = clicked {
                let _ = self.state.try_play(self.state.click(pos));
            }
        });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (toggle_debug, restart, step) = ctx.input(|i| {
            let step = [
                (egui::Key::W, Direction::Up),
                (egui::Key::A, Direction::Left),
                (egui::Key::S, Direction::Down),
                (egui::Key::D, Direction::Right),
                (egui::Key::ArrowUp, Direction::Up),
                (egui::Key::ArrowLeft, Direction::Left),
                (egui::Key::ArrowDown, Direction::Down),
                (egui::Key::ArrowRight, Direction::Right),
            ]
            .into_iter()
            .find_map(|(key, dir)| i.key_pressed(key).then_some(dir));
            (i.key_pressed(egui::Key::F1), i.key_pressed(egui::Key::N), step)
        });

        if toggle_debug {
            self.show_debug = !self.show_debug;
        }
        if restart {
            self.state.reset();
        }

        let stepping = self.state.session.rules().model() == MoveModel::DirectionalStep;
        match step {
            Some(direction) if stepping && self.state.is_human_turn() => {
                let _ = self.state.try_play(HumanMove::Step(direction));
            }
            _ => {}
        }
    }
}

impl eframe::App for GridDuelApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.state.check_ai_result();
        if self.state.is_ai_turn() && !self.state.is_ai_thinking() {
            self.state.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.state.is_ai_thinking() {
            ctx.request_repaint();
        }
    }
}
