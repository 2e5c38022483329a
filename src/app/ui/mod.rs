mod controls;
mod fps;
mod inspector;
mod note_page;
mod panels;
