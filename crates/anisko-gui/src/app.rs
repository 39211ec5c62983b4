use std::path::PathBuf;

use iced::widget::{button, column, container, pick_list, row, rule, text};
use iced::{window, Alignment, Element, Length, Subscription, Task, Theme};
use lucide_icons::iced as icons;

use anisko_api::{AllAnimeClient, HttpCoverSource};
use anisko_core::launcher::AniCliLauncher;
use anisko_core::models::{AnimeSummary, AudioMode};
use anisko_runtime::{Completion, Pending, Session};

use crate::screen::library::{self, Library};
use crate::screen::profile::{self, ProfileScreen};
use crate::screen::{episodes, search, Action, Page};
use crate::style;
use crate::subscription;
use crate::theme::{self, ColorScheme};
use crate::window_state::WindowState;

pub type AppSession = Session<AllAnimeClient, HttpCoverSource, AniCliLauncher>;

/// Await a background fetch and hand its result back to `update`.
pub fn fetch(pending: Pending) -> Task<Message> {
    Task::perform(pending.wait(), Message::Fetched)
}

pub fn fetch_all(pending: Vec<Pending>) -> Task<Message> {
    if pending.is_empty() {
        Task::none()
    } else {
        Task::batch(pending.into_iter().map(fetch))
    }
}

pub struct Anisko {
    session: AppSession,
    library: Library,
    profile: ProfileScreen,
    /// Page to go back to when the episode screen closes.
    return_to: Page,
    /// Cached so `view` does not rebuild it every frame.
    colors: ColorScheme,
    window_state: WindowState,
    data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub enum Message {
    NavigateTo(Page),
    ModeChanged(AudioMode),
    Fetched(Completion),
    WindowEvent(window::Event),
    Escape,
    Search(search::Message),
    Episodes(episodes::Message),
    Library(library::Message),
    Profile(profile::Message),
}

impl Anisko {
    pub fn new(
        session: AppSession,
        window_state: WindowState,
        data_dir: PathBuf,
    ) -> (Self, Task<Message>) {
        let mut library = Library::default();
        library.refresh(&session);
        let mut profile = ProfileScreen::default();
        profile.refresh(&session);
        let colors = ColorScheme::for_key(session.view().theme);

        let app = Self {
            session,
            library,
            profile,
            return_to: Page::Search,
            colors,
            window_state,
            data_dir,
        };
        (app, Task::none())
    }

    pub fn title(&self) -> String {
        match &self.session.view().episodes {
            Some(view) if self.session.view().page == Page::Episodes => {
                format!("{} - Anisko", view.anime.title)
            }
            _ => String::from("Anisko"),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NavigateTo(page) => self.navigate(page),
            Message::ModeChanged(mode) => {
                let task = self.session.set_mode(mode).map(fetch).unwrap_or_else(Task::none);
                self.session.set_status(format!("Audio: {mode}"));
                task
            }
            Message::Fetched(completion) => {
                if !self.session.deliver(completion) {
                    return Task::none();
                }
                fetch_all(self.session.request_covers())
            }
            Message::WindowEvent(event) => {
                match event {
                    window::Event::Resized(size) => {
                        self.window_state.width = size.width;
                        self.window_state.height = size.height;
                        self.window_state.save(&self.data_dir);
                    }
                    window::Event::Moved(pos) => {
                        self.window_state.x = pos.x;
                        self.window_state.y = pos.y;
                        self.window_state.save(&self.data_dir);
                    }
                    _ => {}
                }
                Task::none()
            }
            Message::Escape => match self.session.view().page {
                Page::Episodes => self.update(Message::Episodes(episodes::Message::Back)),
                Page::Search if self.session.view().is_searching() => {
                    self.update(Message::Search(search::Message::Clear))
                }
                _ => Task::none(),
            },
            Message::Search(msg) => {
                let action = search::update(&mut self.session, msg);
                self.handle_action(action)
            }
            Message::Episodes(msg) => {
                let action = episodes::update(&mut self.session, self.return_to, msg);
                self.handle_action(action)
            }
            Message::Library(msg) => {
                let action = self.library.update(&mut self.session, msg);
                self.handle_action(action)
            }
            Message::Profile(msg) => {
                let action = self.profile.update(&mut self.session, msg);
                self.colors = ColorScheme::for_key(self.session.view().theme);
                self.handle_action(action)
            }
        }
    }

    fn navigate(&mut self, page: Page) -> Task<Message> {
        if self.session.view().page == Page::Episodes && page != Page::Episodes {
            self.session.close_episodes();
        }
        self.session.navigate(page);
        if matches!(page, Page::Library | Page::Profile) {
            self.library.refresh(&self.session);
            self.profile.refresh(&self.session);
        }
        fetch_all(self.session.request_covers())
    }

    fn open_anime(&mut self, anime: AnimeSummary) -> Task<Message> {
        let current = self.session.view().page;
        if current != Page::Episodes {
            self.return_to = current;
        }
        tracing::debug!(id = %anime.id, title = %anime.title, "Opening show");
        fetch_all(self.session.open_anime(anime))
    }

    fn handle_action(&mut self, action: Action) -> Task<Message> {
        match action {
            Action::None => Task::none(),
            Action::NavigateTo(page) => self.navigate(page),
            Action::OpenAnime(anime) => self.open_anime(anime),
            Action::RefreshLibrary => {
                self.library.refresh(&self.session);
                Task::none()
            }
            Action::SetStatus(msg) => {
                self.session.set_status(msg);
                Task::none()
            }
            Action::RunTask(task) => task,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let cs = &self.colors;
        let state = self.session.view();

        let page_content: Element<'_, Message> = match state.page {
            Page::Search => search::view(cs, state, &self.library).map(Message::Search),
            Page::Episodes => episodes::view(cs, state).map(Message::Episodes),
            Page::Library => self.library.view(cs, state).map(Message::Library),
            Page::Profile => self
                .profile
                .view(cs, state, &self.library)
                .map(Message::Profile),
        };

        let status_bar = container(
            text(state.status_message.as_str())
                .size(style::TEXT_XS)
                .line_height(style::LINE_HEIGHT_LOOSE),
        )
        .style(theme::status_bar(cs))
        .width(Length::Fill)
        .height(Length::Fixed(style::STATUS_BAR_HEIGHT))
        .padding([style::SPACE_XS, style::SPACE_MD]);

        column![
            row![self.sidebar(cs), page_content].height(Length::Fill),
            status_bar,
        ]
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        subscription::events()
    }

    pub fn theme(&self) -> Theme {
        theme::build_theme(self.session.view().theme, &self.colors)
    }

    fn sidebar<'a>(&'a self, cs: &'a ColorScheme) -> Element<'a, Message> {
        let state = self.session.view();
        // The episode screen is reached from a show, so Search stays lit.
        let current = match state.page {
            Page::Episodes => self.return_to,
            page => page,
        };

        let nav_item = |icon: iced::widget::Text<'static>, label: &'static str, page: Page| {
            button(
                row![
                    icon.size(style::NAV_ICON_SIZE),
                    text(label)
                        .size(style::TEXT_BASE)
                        .line_height(style::LINE_HEIGHT_NORMAL),
                ]
                .spacing(style::SPACE_MD)
                .align_y(Alignment::Center),
            )
            .width(Length::Fill)
            .padding([style::SPACE_SM, style::SPACE_MD])
            .on_press(Message::NavigateTo(page))
            .style(theme::nav_item(current == page, cs))
        };

        let brand = text("anisko")
            .size(style::TEXT_XL)
            .font(style::FONT_HEADING)
            .color(cs.primary)
            .line_height(style::LINE_HEIGHT_TIGHT);

        let audio = column![
            text("AUDIO")
                .size(style::TEXT_XS)
                .font(style::FONT_HEADING)
                .color(cs.outline),
            pick_list(AudioMode::ALL, Some(state.mode), Message::ModeChanged)
                .text_size(style::TEXT_SM)
                .padding([style::SPACE_SM, style::SPACE_MD])
                .width(Length::Fill)
                .style(theme::pick_list_style(cs)),
        ]
        .spacing(style::SPACE_XS);

        let rail = column![
            container(brand).padding([style::SPACE_SM, style::SPACE_MD]),
            column![
                nav_item(icons::icon_search(), "Search", Page::Search),
                nav_item(icons::icon_library(), "Library", Page::Library),
                nav_item(icons::icon_user(), "Profile", Page::Profile),
            ]
            .spacing(style::SPACE_XS),
            iced::widget::Space::new().height(Length::Fill),
            rule::horizontal(1),
            audio,
        ]
        .spacing(style::SPACE_MD)
        .width(Length::Fill)
        .height(Length::Fill);

        container(rail)
            .style(theme::sidebar_bg(cs))
            .width(Length::Fixed(style::SIDEBAR_WIDTH))
            .height(Length::Fill)
            .padding(style::SPACE_MD)
            .into()
    }
}

#[cfg(test)]
pub fn test_session(data_dir: &std::path::Path) -> AppSession {
    use anisko_core::config::AppConfig;
    use anisko_core::storage::PersistentStore;
    use anisko_runtime::FetchCoordinator;

    let config = AppConfig::default();
    let store = PersistentStore::open(data_dir);
    let coordinator = FetchCoordinator::new(
        AllAnimeClient::new(&config.catalog).unwrap(),
        HttpCoverSource::new(&config).unwrap(),
        store.covers_dir(),
        tokio::runtime::Handle::current(),
    );
    Session::new(
        store,
        coordinator,
        AniCliLauncher::new("true"),
        config.general.default_mode,
    )
}
